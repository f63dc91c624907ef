//! Input file reading
//!
//! The input is a JSON document holding either `{"urls": [...]}` or a bare
//! array of URL strings.

use crate::InputError;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputDocument {
    Wrapped { urls: Vec<String> },
    Bare(Vec<String>),
}

impl InputDocument {
    fn into_urls(self) -> Vec<String> {
        match self {
            Self::Wrapped { urls } | Self::Bare(urls) => urls,
        }
    }
}

/// Parses an input document from JSON text
pub fn parse_input_urls(content: &str) -> Result<Vec<String>, InputError> {
    let document: InputDocument = serde_json::from_str(content)?;
    Ok(document.into_urls())
}

/// Reads the candidate URL list from a JSON file
///
/// # Returns
///
/// * `Ok(Vec<String>)` - URLs in file order, unfiltered
/// * `Err(InputError)` - The file is missing, unreadable or not a URL list
pub fn read_input_urls(path: &Path) -> Result<Vec<String>, InputError> {
    let content = std::fs::read_to_string(path)?;
    parse_input_urls(&content)
}
