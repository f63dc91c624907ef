//! Output module
//!
//! This module handles:
//! - The [`RecordSink`] interface the dispatcher writes through
//! - Line-delimited and bundled JSON export
//! - The end-of-run summary

mod json;
pub mod stats;
mod traits;

pub use json::{lines_path_for, JsonExporter};
pub use stats::{format_summary, print_summary};
pub use traits::{MemorySink, OutputError, OutputResult, RecordSink};
