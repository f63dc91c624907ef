//! Proxy pool loaded once at startup

use rand::seq::SliceRandom;
use std::io::ErrorKind;
use std::path::Path;
use url::Url;

/// Immutable set of proxy endpoints
///
/// Selection is a uniform random pick; an empty pool means direct
/// connections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyPool {
    proxies: Vec<String>,
}

impl ProxyPool {
    pub fn new(proxies: Vec<String>) -> Self {
        Self { proxies }
    }

    /// A pool that always connects directly
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses proxy list text
    ///
    /// One proxy URI per line. Blank lines and lines starting with `#` are
    /// ignored; lines that are not valid URIs are skipped with a warning.
    pub fn parse(content: &str) -> Self {
        let proxies = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter(|line| match Url::parse(line) {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!("Skipping invalid proxy entry '{}': {}", line, e);
                    false
                }
            })
            .map(str::to_string)
            .collect();

        Self { proxies }
    }

    /// Loads a proxy list file
    ///
    /// A missing file is not an error: a warning is logged and the pool is
    /// empty. Other read failures are returned.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let pool = Self::parse(&content);
                tracing::info!("Loaded {} proxies from {}", pool.len(), path.display());
                Ok(pool)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("Proxy file not found: {}", path.display());
                Ok(Self::empty())
            }
            Err(e) => Err(e),
        }
    }

    /// Picks one proxy uniformly at random
    pub fn pick(&self) -> Option<&str> {
        self.proxies
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.proxies.iter().map(String::as_str)
    }
}
