//! Integration tests for Company-Harvest
//!
//! These tests use wiremock to stand in for the target site and exercise
//! the real reqwest transport end-to-end.

mod fetch_tests;
mod harvest_tests;

use company_harvest::config::{FetchConfig, ThrottleConfig};
use company_harvest::{FetchClient, ProxyPool, Throttle};
use company_harvest::client::{ReqwestTransport, Transport, ThrottlePolicy};
use std::sync::Arc;

/// Fetch settings with a short schedule so exhausted runs finish quickly
pub fn fast_fetch_config() -> FetchConfig {
    FetchConfig {
        max_concurrency: 4,
        request_timeout_secs: 5,
        connect_timeout_secs: 2,
        retry_delays: vec![0.0, 0.02, 0.02, 0.02, 0.02],
        ..FetchConfig::default()
    }
}

pub fn fast_throttle() -> Throttle {
    let config = ThrottleConfig {
        min_delay: 0.001,
        max_delay: 0.05,
        ..ThrottleConfig::default()
    };
    Throttle::new(ThrottlePolicy::from(&config))
}

/// Fetch client over the given transport
pub fn client_over(transport: Arc<dyn Transport>, config: &FetchConfig) -> FetchClient {
    FetchClient::new(transport, config, fast_throttle(), ProxyPool::empty())
}

/// Fetch client using the production transport
pub fn reqwest_client(config: &FetchConfig) -> FetchClient {
    let transport = ReqwestTransport::new(config, &ProxyPool::empty())
        .expect("Failed to build reqwest transport");
    client_over(Arc::new(transport), config)
}
