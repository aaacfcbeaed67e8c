mod classify;
pub mod constants;
pub mod discover;
pub mod filler;
mod interval;
pub mod layout;
mod options;
pub mod pipeline;
mod stats;
pub mod tools;
mod types;

pub use classify::classify_orientation;
pub use discover::{ScheduledFile, select_files};
pub use interval::resolve_interval;
pub use layout::{Buckets, Composition, bucketize, compose, sequence_intervals};
pub use options::*;
pub use pipeline::{Pipeline, Presentation};
pub use stats::calculate_statistics;
pub use tools::{ExternalTools, ToolLog};
pub use types::*;
