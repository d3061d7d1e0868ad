//! Processing pipeline components.

mod coordinator;

pub use coordinator::{
    DistanceResult, PipelineOptions, PipelineReport, process_distance, run_pipeline,
    site_visit_universe, truncate_all,
};
