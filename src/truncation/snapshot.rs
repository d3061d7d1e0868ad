//! Per-distance threshold snapshots.

use std::collections::BTreeMap;

use crate::input::{Habitat, Hardware};
use crate::truncation::reference::{ReferenceSpeciesMap, Resolution};
use crate::truncation::table::AmplitudePredictionTable;

/// Threshold cells of one species over {open, forested} x {legacy, modern}.
///
/// An absent cell means no calibrated threshold lies within snap tolerance
/// of the snapshot distance. Absence is an explicit state, distinct from a
/// threshold of zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpeciesThresholds {
    cells: [Option<f64>; 4],
}

impl SpeciesThresholds {
    fn slot(habitat: Habitat, hardware: Hardware) -> usize {
        let h = match habitat {
            Habitat::Open => 0,
            Habitat::Forested => 1,
        };
        let g = match hardware {
            Hardware::Legacy => 0,
            Hardware::Modern => 1,
        };
        h * 2 + g
    }

    /// Threshold in dBFS for a (habitat, hardware) cell, if calibrated.
    pub fn get(&self, habitat: Habitat, hardware: Hardware) -> Option<f64> {
        self.cells[Self::slot(habitat, hardware)]
    }

    /// Set one cell.
    pub fn set(&mut self, habitat: Habitat, hardware: Hardware, threshold_dbfs: Option<f64>) {
        self.cells[Self::slot(habitat, hardware)] = threshold_dbfs;
    }

    /// True when no cell carries a threshold.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

/// All species' threshold cells at one truncation distance.
#[derive(Debug, Clone)]
pub struct ThresholdSnapshot {
    distance_m: u32,
    by_species: BTreeMap<String, SpeciesThresholds>,
}

impl ThresholdSnapshot {
    /// Build the snapshot for one distance over the working species set.
    ///
    /// Each species resolves its four cells independently through the
    /// prediction table, substituting its proxy's curve where one is
    /// configured. Species under a shared-curve rule are filled in a second
    /// pass by copying their sibling's finished cells verbatim.
    ///
    /// A distance with no calibrated cell at all still yields a snapshot;
    /// absence of calibration data is data, not a fault.
    pub fn build(
        distance_m: u32,
        species: &[String],
        table: &AmplitudePredictionTable,
        reference: &ReferenceSpeciesMap,
    ) -> Self {
        let mut by_species: BTreeMap<String, SpeciesThresholds> = BTreeMap::new();
        let mut copies: Vec<(String, String)> = Vec::new();

        for code in species {
            let lookup_code = match reference.resolution_for(code) {
                Resolution::CopyOf(source) => {
                    copies.push((code.clone(), source));
                    by_species.insert(code.clone(), SpeciesThresholds::default());
                    continue;
                }
                Resolution::Proxy(proxy) => proxy,
                Resolution::Own => code.clone(),
            };

            let mut thresholds = SpeciesThresholds::default();
            for habitat in [Habitat::Open, Habitat::Forested] {
                for hardware in [Hardware::Legacy, Hardware::Modern] {
                    let cell = table
                        .nearest(distance_m, &lookup_code, habitat, hardware)
                        .map(|estimate| estimate.predicted_dbfs);
                    thresholds.set(habitat, hardware, cell);
                }
            }
            by_species.insert(code.clone(), thresholds);
        }

        for (copier, source) in copies {
            if let Some(sibling) = by_species.get(&source).copied() {
                by_species.insert(copier, sibling);
            }
        }

        Self {
            distance_m,
            by_species,
        }
    }

    /// The truncation distance this snapshot was built for.
    pub fn distance_m(&self) -> u32 {
        self.distance_m
    }

    /// Threshold cells for a species, or `None` outside the working set.
    pub fn thresholds(&self, species: &str) -> Option<&SpeciesThresholds> {
        self.by_species.get(species)
    }

    /// Working species codes in sorted order.
    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.by_species.keys().map(String::as_str)
    }

    /// True when every cell of every species is uncalibrated.
    pub fn is_uncalibrated(&self) -> bool {
        self.by_species.values().all(SpeciesThresholds::is_empty)
    }
}
