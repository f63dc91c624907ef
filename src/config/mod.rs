//! Configuration module for Company-Harvest
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then command-line overrides applied by the binary.
//!
//! # Example
//!
//! ```no_run
//! use company_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Retry schedule: {:?}", config.fetch.retry_delays);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    secs_to_duration, Config, FetchConfig, OutputConfig, ThrottleConfig, DEFAULT_RETRY_DELAYS,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, MIN_REQUEST_TIMEOUT_SECS};
