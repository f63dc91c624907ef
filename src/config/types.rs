use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default retry schedule: the first attempt goes out immediately, later
/// attempts wait the listed number of seconds first.
pub const DEFAULT_RETRY_DELAYS: [f64; 5] = [0.0, 0.5, 1.5, 3.0, 5.0];

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; CompanyHarvest/1.0)";

/// Main configuration structure for Company-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub throttle: ThrottleConfig,
    pub output: OutputConfig,
}

/// Fetch client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    /// Maximum number of requests in flight at once
    pub max_concurrency: usize,

    /// Maximum number of URLs processed at once by the dispatcher.
    /// Falls back to `max_concurrency` when unset.
    pub dispatch_concurrency: Option<usize>,

    /// Per-attempt network timeout (seconds)
    pub request_timeout_secs: u64,

    /// TCP connect timeout (seconds)
    pub connect_timeout_secs: u64,

    /// Fixed User-Agent header value
    pub user_agent: String,

    /// Wait before each attempt (seconds); its length is the attempt budget
    pub retry_delays: Vec<f64>,

    /// Optional proxy list file, one URI per line
    pub proxy_file: Option<PathBuf>,
}

impl FetchConfig {
    /// Effective dispatcher bound
    pub fn dispatch_limit(&self) -> usize {
        self.dispatch_concurrency.unwrap_or(self.max_concurrency)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Retry schedule as durations
    pub fn retry_schedule(&self) -> Vec<Duration> {
        self.retry_delays
            .iter()
            .map(|secs| secs_to_duration(*secs))
            .collect()
    }
}

/// Seconds to `Duration`, saturating instead of panicking
///
/// Negative and NaN inputs give zero; values past the `Duration` range give
/// `Duration::MAX`. Validated configs never reach either case.
pub fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            dispatch_concurrency: None,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry_delays: DEFAULT_RETRY_DELAYS.to_vec(),
            proxy_file: None,
        }
    }
}

/// Adaptive throttle tuning (all delays in seconds)
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ThrottleConfig {
    /// Floor for the inter-request delay
    pub min_delay: f64,

    /// Ceiling for the inter-request delay
    pub max_delay: f64,

    /// Multiplier applied on success
    pub success_factor: f64,

    /// Multiplier applied on failure
    pub failure_factor: f64,

    /// Added after the failure multiplier so the delay can grow from zero
    pub failure_increment: f64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_delay: 0.01,
            max_delay: 2.0,
            success_factor: 0.8,
            failure_factor: 1.7,
            failure_increment: 0.05,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the pretty-printed JSON bundle; the `.jsonl` file sits next to it
    pub path: PathBuf,

    /// Attach a raw HTML snippet to every record
    pub include_raw: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("out.json"),
            include_raw: false,
        }
    }
}
