//! End-of-run summary printed by the binary

use crate::dispatch::BatchResult;
use std::path::Path;

/// Failed URLs listed in the summary before it is truncated
const MAX_LISTED_ERRORS: usize = 10;

/// Renders the run summary as plain text
pub fn format_summary(batch: &BatchResult, bundle_path: &Path) -> String {
    let stats = batch.stats();
    let mut out = String::new();

    out.push_str("=== Harvest Summary ===\n\n");
    out.push_str(&format!("  Records written: {}\n", stats.records));
    out.push_str(&format!("  Failed URLs: {}\n", stats.errors));
    out.push_str(&format!("  Success rate: {:.1}%\n", stats.success_rate()));
    out.push_str(&format!("  Output: {}\n", bundle_path.display()));

    if !batch.errors.is_empty() {
        out.push_str("\nFailures:\n");
        for failed in batch.errors.iter().take(MAX_LISTED_ERRORS) {
            out.push_str(&format!("  - {}: {}\n", failed.url, failed.error));
        }
        if batch.errors.len() > MAX_LISTED_ERRORS {
            out.push_str(&format!(
                "  ... and {} more\n",
                batch.errors.len() - MAX_LISTED_ERRORS
            ));
        }
    }

    out
}

/// Prints the run summary to stdout
pub fn print_summary(batch: &BatchResult, bundle_path: &Path) {
    print!("{}", format_summary(batch, bundle_path));
}
