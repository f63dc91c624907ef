//! Company-Harvest: an adaptive, rate-limited company page scraper
//!
//! This crate fetches public company profile pages from a fixed list of URLs,
//! extracts structured company data and writes it as line-delimited and
//! bundled JSON. Fetching backs off adaptively when the target rate-limits.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod extract;
pub mod input;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Company-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("No valid company URLs provided")]
    NoValidUrls,

    #[error("Failed to fetch {url} after {attempts} attempts")]
    FetchExhausted { url: String, attempts: usize },

    #[error("Request for {url} rejected: {reason}")]
    FetchRejected { url: String, reason: String },

    #[error("Failed to extract company data from {url}: {source}")]
    Extract {
        url: String,
        source: extract::ExtractError,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised while reading the input URL list
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read input file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported input format, expected {{\"urls\": [...]}} or a list of URLs: {0}")]
    Format(#[from] serde_json::Error),
}

/// Result type alias for Company-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use client::{FetchClient, ProxyPool, Throttle};
pub use config::Config;
pub use dispatch::{BatchResult, Dispatcher};
pub use extract::{CompanyPageParser, CompanyRecord};
pub use url::{is_company_url, prepare_targets};
