//! URL handling module for Company-Harvest
//!
//! This module provides the company-page validity predicate, target list
//! preparation (filtering and deduplication), domain extraction and
//! website canonicalization.

mod domain;
mod matcher;
mod normalize;

use crate::HarvestError;
use std::collections::HashSet;

// Re-export main functions
pub use domain::{extract_domain, is_target_domain};
pub use matcher::is_company_url;
pub use normalize::normalize_website;

/// Removes duplicate URLs, keeping the first occurrence of each
pub fn dedupe_urls<I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|u| seen.insert(u.clone()))
        .collect()
}

/// Turns raw input URLs into the list of targets to dispatch
///
/// Each entry is trimmed; blank entries and anything that is not a company
/// profile URL are dropped silently, then duplicates are removed with the
/// first occurrence winning.
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Targets in input order
/// * `Err(HarvestError::NoValidUrls)` - Nothing survived filtering
///
/// # Examples
///
/// ```
/// use company_harvest::url::prepare_targets;
///
/// let targets = prepare_targets(&[
///     "https://www.linkedin.com/company/acme".to_string(),
///     "https://example.com/x".to_string(),
///     "https://www.linkedin.com/company/acme".to_string(),
/// ]).unwrap();
/// assert_eq!(targets, vec!["https://www.linkedin.com/company/acme".to_string()]);
/// ```
pub fn prepare_targets(urls: &[String]) -> Result<Vec<String>, HarvestError> {
    let valid = urls
        .iter()
        .map(|u| u.trim())
        .filter(|u| !u.is_empty() && is_company_url(u))
        .map(str::to_string);

    let targets = dedupe_urls(valid);
    let dropped = urls.len() - targets.len();
    if dropped > 0 {
        tracing::debug!(dropped, "Dropped invalid or duplicate input URLs");
    }

    if targets.is_empty() {
        return Err(HarvestError::NoValidUrls);
    }

    Ok(targets)
}
