//! Input table readers and record types.

mod amplitude;
mod detections;
mod site_visits;
mod types;

pub use amplitude::read_amplitude_table;
pub use detections::read_detections;
pub use site_visits::{eligible_sites, read_site_visit_counts};
pub use types::{AmplitudeRecord, Detection, Habitat, Hardware, SiteVisit, SiteVisitCount};
