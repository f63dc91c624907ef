//! Record sink trait and output errors

use crate::extract::CompanyRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Sink already finalized")]
    Finalized,
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Consumer of finished records
///
/// The dispatcher calls the sink from a single task, in completion order.
/// A failed `write_record` means the record was not persisted; the caller
/// reports it as a per-URL error instead.
pub trait RecordSink: Send {
    /// Persists one normalized record
    fn write_record(&mut self, record: &CompanyRecord) -> OutputResult<()>;

    /// Notes that `url` failed with `error`
    fn write_error(&mut self, url: &str, error: &str) -> OutputResult<()>;

    /// Writes whatever is produced once at the end of a run
    fn finalize(&mut self) -> OutputResult<()>;
}

/// Sink that keeps everything in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<CompanyRecord>,
    pub errors: Vec<(String, String)>,
    pub finalized: bool,
}

impl RecordSink for MemorySink {
    fn write_record(&mut self, record: &CompanyRecord) -> OutputResult<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn write_error(&mut self, url: &str, error: &str) -> OutputResult<()> {
        self.errors.push((url.to_string(), error.to_string()));
        Ok(())
    }

    fn finalize(&mut self) -> OutputResult<()> {
        self.finalized = true;
        Ok(())
    }
}
