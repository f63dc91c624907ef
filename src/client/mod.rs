//! Fetch client module
//!
//! This module contains everything that decides when and how a request is
//! issued:
//! - Adaptive throttling shared by all attempts of a client
//! - Bounded concurrency for in-flight requests
//! - Per-URL retry state machine and response classification
//! - Proxy pool and the reqwest transport

mod fetcher;
mod proxy;
mod retry;
mod throttle;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use fetcher::FetchClient;
pub use proxy::ProxyPool;
pub use retry::{classify, is_block_status, FailureReason, FetchAttempt, FetchOutcome, RetryState};
pub use throttle::{Throttle, ThrottlePolicy, ThrottleState};
pub use transport::{
    build_http_client, ReqwestTransport, Transport, TransportError, TransportResponse,
};
