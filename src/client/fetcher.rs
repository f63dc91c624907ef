//! Bounded-concurrency, retrying fetch client
//!
//! Every attempt passes two independent gates in order: the adaptive
//! throttle wait, then a slot of the shared concurrency bound. The slot is
//! held for the optional backoff sleep and the request itself, and is
//! released on every exit path when the permit drops.

use crate::client::retry::{classify, FetchAttempt, FetchOutcome, FailureReason, RetryState};
use crate::client::throttle::{Throttle, ThrottlePolicy};
use crate::client::transport::{ReqwestTransport, Transport, TransportError};
use crate::client::ProxyPool;
use crate::config::Config;
use crate::config::FetchConfig;
use crate::HarvestError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Fetches page bodies with throttling, bounded concurrency and retries
pub struct FetchClient {
    transport: Arc<dyn Transport>,
    throttle: Throttle,
    slots: Arc<Semaphore>,
    proxies: ProxyPool,
    retry_delays: Vec<Duration>,
    request_timeout: Duration,
}

impl FetchClient {
    /// Creates a client over any transport
    ///
    /// The throttle is injected so callers decide whether it is shared with
    /// other clients.
    pub fn new(
        transport: Arc<dyn Transport>,
        config: &FetchConfig,
        throttle: Throttle,
        proxies: ProxyPool,
    ) -> Self {
        Self {
            transport,
            throttle,
            slots: Arc::new(Semaphore::new(config.max_concurrency.max(1))),
            proxies,
            retry_delays: config.retry_schedule(),
            request_timeout: config.request_timeout(),
        }
    }

    /// Creates a reqwest-backed client with its own throttle
    ///
    /// # Returns
    ///
    /// * `Ok(FetchClient)` - Client ready for use
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn from_config(config: &Config, proxies: ProxyPool) -> Result<Self, HarvestError> {
        let transport = ReqwestTransport::new(&config.fetch, &proxies)?;
        let throttle = Throttle::new(ThrottlePolicy::from(&config.throttle));
        Ok(Self::new(
            Arc::new(transport),
            &config.fetch,
            throttle,
            proxies,
        ))
    }

    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// Number of attempts a fetch makes before giving up
    pub fn max_attempts(&self) -> usize {
        self.retry_delays.len()
    }

    /// Fetches the body of `url`
    ///
    /// One proxy is chosen per call and kept for all of its attempts.
    /// Attempts are strictly sequential; intermediate failures are logged
    /// and retried, never returned.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Body of the first response classified as success
    /// * `Err(HarvestError::FetchExhausted)` - Every attempt failed
    /// * `Err(HarvestError::FetchRejected)` - An attempt failed terminally
    pub async fn fetch(&self, url: &str) -> Result<String, HarvestError> {
        let proxy = self.proxies.pick();
        let total = self.max_attempts();
        let mut state = RetryState::start(total);

        while let RetryState::Attempting(attempt_number) = state {
            let attempt = FetchAttempt {
                url,
                attempt_number,
                delay_before_attempt: self.retry_delays[attempt_number],
                proxy,
            };

            let outcome = self.attempt(&attempt).await;
            state = state.advance(&outcome, total);

            match outcome {
                FetchOutcome::Success(body) => {
                    tracing::debug!(url, attempt = attempt_number + 1, "Fetched page");
                    return Ok(body);
                }
                FetchOutcome::TerminalFailure(reason) => {
                    return Err(HarvestError::FetchRejected {
                        url: url.to_string(),
                        reason: reason.to_string(),
                    });
                }
                FetchOutcome::RetryableFailure(reason) => {
                    tracing::warn!(
                        url,
                        attempt = attempt_number + 1,
                        of = total,
                        "Attempt failed: {}",
                        reason
                    );
                    state = state.resume();
                }
            }
        }

        let attempts = match state {
            RetryState::Exhausted { attempts } => attempts,
            _ => total,
        };
        Err(HarvestError::FetchExhausted {
            url: url.to_string(),
            attempts,
        })
    }

    /// Runs a single attempt and feeds its outcome to the throttle
    async fn attempt(&self, attempt: &FetchAttempt<'_>) -> FetchOutcome {
        self.throttle.wait().await;

        let _permit = match self.slots.acquire().await {
            Ok(permit) => permit,
            Err(_) => return FetchOutcome::TerminalFailure(FailureReason::ClientClosed),
        };

        if !attempt.delay_before_attempt.is_zero() {
            tracing::debug!(
                url = attempt.url,
                backoff_ms = attempt.delay_before_attempt.as_millis() as u64,
                "Backing off before retry"
            );
            tokio::time::sleep(attempt.delay_before_attempt).await;
        }

        let request = self.transport.get(attempt.url, attempt.proxy);
        let result = match tokio::time::timeout(self.request_timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout),
        };

        let outcome = classify(result);
        match &outcome {
            FetchOutcome::Success(_) => self.throttle.feedback(true).await,
            FetchOutcome::RetryableFailure(_) => self.throttle.feedback(false).await,
            FetchOutcome::TerminalFailure(_) => {}
        }

        outcome
    }

    /// Stops issuing requests; in-flight attempts finish, later ones are rejected
    pub fn close(&self) {
        self.slots.close();
    }
}
