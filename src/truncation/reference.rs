//! Reference species substitution.
//!
//! A few focal species left too few calibration songs to fit their own
//! attenuation curve; each stands in for by a proxy species whose curve
//! substitutes for it. One focal species additionally shares its sibling's
//! finished threshold table instead of running its own lookups.

use std::collections::HashMap;

/// How one species' thresholds are resolved in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The species' own curve was fitted; look it up directly.
    Own,
    /// Substitute the named proxy's curve before lookup.
    Proxy(String),
    /// Copy the finished threshold table of a sibling focal species
    /// verbatim after the lookup pass.
    CopyOf(String),
}

/// Fixed mapping from focal species to the proxies calibrated for them.
///
/// Built proxy-to-focal internally; callers query focal-to-proxy. Codes
/// outside the map resolve to [`Resolution::Own`], and unknown proxy codes
/// yield `None` rather than a default.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSpeciesMap {
    by_proxy: HashMap<String, String>,
    shared: Option<(String, String)>,
}

impl ReferenceSpeciesMap {
    /// Build the map from (focal, proxy) pairs and an optional shared-curve
    /// pair of (copying focal, source focal).
    pub fn new(
        pairs: impl IntoIterator<Item = (String, String)>,
        shared: Option<(String, String)>,
    ) -> Self {
        let by_proxy = pairs
            .into_iter()
            .map(|(focal, proxy)| (proxy, focal))
            .collect();
        Self { by_proxy, shared }
    }

    /// The focal species a proxy stands in for, if any.
    pub fn focal_for_proxy(&self, proxy: &str) -> Option<&str> {
        self.by_proxy.get(proxy).map(String::as_str)
    }

    /// The proxy whose curve substitutes for a focal species, if any.
    pub fn proxy_for(&self, focal: &str) -> Option<&str> {
        self.by_proxy
            .iter()
            .find(|(_, mapped_focal)| mapped_focal.as_str() == focal)
            .map(|(proxy, _)| proxy.as_str())
    }

    /// The shared-curve pair (copying focal, source focal), if configured.
    pub fn shared_pair(&self) -> Option<(&str, &str)> {
        self.shared
            .as_ref()
            .map(|(copier, source)| (copier.as_str(), source.as_str()))
    }

    /// Resolution rule for a species in the working set.
    pub fn resolution_for(&self, species: &str) -> Resolution {
        if let Some((copier, source)) = self.shared_pair()
            && copier == species
        {
            return Resolution::CopyOf(source.to_string());
        }
        match self.proxy_for(species) {
            Some(proxy) => Resolution::Proxy(proxy.to_string()),
            None => Resolution::Own,
        }
    }
}
