//! JSON output
//!
//! Records are appended to a line-delimited `.jsonl` file as they arrive,
//! so a crashed run still leaves everything scraped so far on disk. The
//! pretty-printed bundle is written once by [`RecordSink::finalize`].

use crate::dispatch::{BatchStats, FailedUrl};
use crate::extract::CompanyRecord;
use crate::output::traits::{OutputError, OutputResult, RecordSink};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Shape of the final bundle
#[derive(Debug, Serialize)]
struct Bundle<'a> {
    records: &'a [CompanyRecord],
    errors: &'a [FailedUrl],
    stats: BatchStats,
}

/// Writes `<out>.jsonl` during the run and `<out>` at the end
pub struct JsonExporter {
    bundle_path: PathBuf,
    lines_path: PathBuf,
    lines: Option<BufWriter<File>>,
    records: Vec<CompanyRecord>,
    errors: Vec<FailedUrl>,
}

impl JsonExporter {
    /// Creates the line-delimited file next to `bundle_path`
    ///
    /// Missing parent directories are created. An existing `.jsonl` file is
    /// truncated.
    ///
    /// # Returns
    ///
    /// * `Ok(JsonExporter)` - Ready to receive records
    /// * `Err(OutputError)` - The file could not be created
    pub fn create(bundle_path: impl Into<PathBuf>) -> OutputResult<Self> {
        let bundle_path = bundle_path.into();
        let lines_path = lines_path_for(&bundle_path);

        if let Some(parent) = bundle_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(&lines_path)?;
        tracing::debug!("Writing records to {}", lines_path.display());

        Ok(Self {
            bundle_path,
            lines_path,
            lines: Some(BufWriter::new(file)),
            records: Vec::new(),
            errors: Vec::new(),
        })
    }

    pub fn bundle_path(&self) -> &Path {
        &self.bundle_path
    }

    pub fn lines_path(&self) -> &Path {
        &self.lines_path
    }

    pub fn stats(&self) -> BatchStats {
        BatchStats {
            records: self.records.len(),
            errors: self.errors.len(),
        }
    }
}

/// `out.json` becomes `out.jsonl`; a path without extension gets `.jsonl`
pub fn lines_path_for(bundle_path: &Path) -> PathBuf {
    bundle_path.with_extension("jsonl")
}

impl RecordSink for JsonExporter {
    fn write_record(&mut self, record: &CompanyRecord) -> OutputResult<()> {
        let writer = self.lines.as_mut().ok_or(OutputError::Finalized)?;

        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        self.records.push(record.clone());
        Ok(())
    }

    fn write_error(&mut self, url: &str, error: &str) -> OutputResult<()> {
        self.errors.push(FailedUrl {
            url: url.to_string(),
            error: error.to_string(),
        });
        Ok(())
    }

    fn finalize(&mut self) -> OutputResult<()> {
        let mut lines = self.lines.take().ok_or(OutputError::Finalized)?;
        lines.flush()?;

        let bundle = Bundle {
            records: &self.records,
            errors: &self.errors,
            stats: self.stats(),
        };

        let mut writer = BufWriter::new(File::create(&self.bundle_path)?);
        serde_json::to_writer_pretty(&mut writer, &bundle)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::info!(
            "Wrote {} records and {} errors to {}",
            bundle.stats.records,
            bundle.stats.errors,
            self.bundle_path.display()
        );
        Ok(())
    }
}
