//! Input record type definitions.

use chrono::NaiveDateTime;

use crate::constants::habitat::{FORESTED_FROM_YEARS, OPEN_BELOW_YEARS};

/// Acoustic habitat class at a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Habitat {
    /// Recently harvested, little canopy between bird and recorder.
    Open,
    /// Regenerated or unharvested canopy.
    Forested,
}

impl Habitat {
    /// Classify a site from its years-since-harvest.
    ///
    /// Sites younger than 11 years are open, sites of 12 years or more are
    /// forested. Age 11 is an excluded band with no class; by study design
    /// no surveyed site carries it, and records that do are dropped rather
    /// than merged into either class.
    pub fn from_years_since_harvest(years: u32) -> Option<Self> {
        if years < OPEN_BELOW_YEARS {
            Some(Self::Open)
        } else if years >= FORESTED_FROM_YEARS {
            Some(Self::Forested)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Habitat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Forested => write!(f, "forested"),
        }
    }
}

impl std::str::FromStr for Habitat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "forested" => Ok(Self::Forested),
            other => Err(format!("unknown habitat class: {other}")),
        }
    }
}

/// Recording hardware generation.
///
/// Accepts the unit model names deployed in the field (`SM2`, `SM4`) as
/// aliases for the generation they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hardware {
    /// First-deployment recorders (SM2 units).
    Legacy,
    /// Replacement recorders (SM4 units).
    Modern,
}

impl std::fmt::Display for Hardware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Modern => write!(f, "modern"),
        }
    }
}

impl std::str::FromStr for Hardware {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" | "sm2" => Ok(Self::Legacy),
            "modern" | "sm4" => Ok(Self::Modern),
            other => Err(format!("unknown recorder generation: {other}")),
        }
    }
}

/// One tagged bird vocalization from the annotation platform.
///
/// Immutable once produced; the pipeline only reads these.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Site identifier.
    pub site: String,
    /// Visit timestamp.
    pub visit: NaiveDateTime,
    /// Species code (four-letter alpha code).
    pub species: String,
    /// Measured amplitude in dBFS, averaged across both channels.
    pub amplitude_dbfs: f64,
    /// Years since the site was harvested.
    pub years_since_harvest: u32,
    /// Recorder generation at the site.
    pub hardware: Hardware,
}

impl Detection {
    /// Habitat class of the detection's site, or `None` in the age-11 gap.
    pub fn habitat(&self) -> Option<Habitat> {
        Habitat::from_years_since_harvest(self.years_since_harvest)
    }
}

/// A completed, transcribed survey occasion.
///
/// Exists independently of whether any target species was detected; the
/// set of these is the universe abundance matrices are reconciled against.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SiteVisit {
    /// Site identifier.
    pub site: String,
    /// Visit timestamp.
    pub visit: NaiveDateTime,
}

impl SiteVisit {
    /// Key of a detection's survey occasion.
    pub fn of(detection: &Detection) -> Self {
        Self {
            site: detection.site.clone(),
            visit: detection.visit,
        }
    }
}

/// One row of the fitted sound-attenuation surface.
#[derive(Debug, Clone)]
pub struct AmplitudeRecord {
    /// Distance from the recorder in meters. Dense grid, not necessarily
    /// integer-aligned.
    pub distance_m: f64,
    /// Species code the curve was fitted for.
    pub species: String,
    /// Habitat class the curve was fitted in.
    pub habitat: Habitat,
    /// Recorder generation the curve was fitted with.
    pub hardware: Hardware,
    /// Predicted amplitude point estimate in dBFS.
    pub predicted_dbfs: f64,
    /// Lower interval bound in dBFS.
    pub lower_dbfs: f64,
    /// Upper interval bound in dBFS.
    pub upper_dbfs: f64,
}

/// Transcription effort at one site.
#[derive(Debug, Clone)]
pub struct SiteVisitCount {
    /// Site identifier.
    pub site: String,
    /// Number of transcribed visits.
    pub visits: u32,
}
