//! Command-line interface.

mod args;
mod validators;

pub use args::{Cli, Command, ConfigAction, TruncateArgs};
pub use validators::{DistanceSelection, parse_distance_selection};
