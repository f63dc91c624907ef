//! Partitioned result of a dispatch run

use crate::extract::CompanyRecord;
use serde::{Deserialize, Serialize};

/// A URL that produced no record, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedUrl {
    pub url: String,
    pub error: String,
}

/// Counts written to the `stats` section of the bundle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub records: usize,
    pub errors: usize,
}

impl BatchStats {
    /// Share of attempted URLs that produced a record, as a percentage
    pub fn success_rate(&self) -> f64 {
        let total = self.records + self.errors;
        if total == 0 {
            return 0.0;
        }
        (self.records as f64 / total as f64) * 100.0
    }
}

/// Records and errors of one run, in completion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub records: Vec<CompanyRecord>,
    pub errors: Vec<FailedUrl>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_record(&mut self, record: CompanyRecord) {
        self.records.push(record);
    }

    pub fn push_error(&mut self, url: impl Into<String>, error: impl Into<String>) {
        self.errors.push(FailedUrl {
            url: url.into(),
            error: error.into(),
        });
    }

    /// Number of URLs that reached a final outcome
    pub fn completed(&self) -> usize {
        self.records.len() + self.errors.len()
    }

    pub fn stats(&self) -> BatchStats {
        BatchStats {
            records: self.records.len(),
            errors: self.errors.len(),
        }
    }
}
