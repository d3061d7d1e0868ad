//! Configuration type definitions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::effort::MIN_VISITS;
use crate::truncation::ReferenceSpeciesMap;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Working species set.
    #[serde(default)]
    pub species: SpeciesConfig,

    /// Reference species substitution.
    #[serde(default)]
    pub reference: ReferenceConfig,

    /// Global site exclusions.
    #[serde(default)]
    pub exclusions: ExclusionsConfig,
}

/// Default pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Truncation distance selection, as a range (`30-500`) or comma list
    /// (`50,100,150`). Defaults to the full working range when unset.
    pub distances: Option<String>,

    /// Minimum transcribed visits for a site to enter the analysis.
    pub min_visits: u32,

    /// Prepend a UTF-8 BOM to abundance CSVs for Excel compatibility.
    pub csv_bom: bool,

    /// Default output directory.
    pub output_dir: Option<PathBuf>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            distances: None,
            min_visits: MIN_VISITS,
            csv_bom: true,
            output_dir: None,
        }
    }
}

/// Working species set configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesConfig {
    /// Species codes counted in the abundance matrices.
    pub working: Vec<String>,
}

impl Default for SpeciesConfig {
    fn default() -> Self {
        Self {
            working: [
                "OVEN", "TEWA", "SWTH", "WTSP", "CHSP", "YRWA", "REVI", "WAVI", "PHVI", "BOCH",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Reference species substitution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Focal species mapped to the proxy whose curve substitutes for them.
    pub proxies: BTreeMap<String, String>,

    /// Focal species that copies a sibling's finished threshold table.
    pub shared_curve: Option<SharedCurveConfig>,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        let mut proxies = BTreeMap::new();
        proxies.insert("BOCH".to_string(), "BCCH".to_string());
        proxies.insert("WAVI".to_string(), "REVI".to_string());
        Self {
            proxies,
            shared_curve: Some(SharedCurveConfig {
                focal: "PHVI".to_string(),
                sibling: "WAVI".to_string(),
            }),
        }
    }
}

impl ReferenceConfig {
    /// Build the runtime reference map from the configured pairs.
    pub fn to_map(&self) -> ReferenceSpeciesMap {
        ReferenceSpeciesMap::new(
            self.proxies
                .iter()
                .map(|(focal, proxy)| (focal.clone(), proxy.clone())),
            self.shared_curve
                .as_ref()
                .map(|shared| (shared.focal.clone(), shared.sibling.clone())),
        )
    }
}

/// A focal species sharing its sibling's threshold table verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedCurveConfig {
    /// The species whose thresholds are copied in.
    pub focal: String,
    /// The sibling focal species whose finished table is the source.
    pub sibling: String,
}

/// Global site exclusion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionsConfig {
    /// Sites dropped before aggregation (retention patches far outside the
    /// study's design envelope).
    pub sites: Vec<String>,
}

impl Default for ExclusionsConfig {
    fn default() -> Self {
        Self {
            sites: vec!["C-041".to_string(), "C-087".to_string()],
        }
    }
}
