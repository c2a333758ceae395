//! Monthly air-traffic-control counts per Korean airport: load the wide CSV
//! export, normalize it, unpivot it to (region, month, count) records and
//! filter them by a region selection.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod present;
pub mod process;

pub use error::{PipelineError, Result};
