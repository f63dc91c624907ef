//! Adaptive request throttle
//!
//! A single delay value gates every request: callers wait until at least
//! that long has passed since the previous request. Successes shrink the
//! delay multiplicatively toward the floor, failures grow it faster toward
//! the ceiling.
//!
//! Time comes from the tokio clock, so tests running with a paused runtime
//! observe deterministic waits.

use crate::config::{secs_to_duration, ThrottleConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Tuning for the adaptive delay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrottlePolicy {
    /// Floor for the delay
    pub min_delay: Duration,

    /// Ceiling for the delay
    pub max_delay: Duration,

    /// Multiplier applied on success
    pub success_factor: f64,

    /// Multiplier applied on failure
    pub failure_factor: f64,

    /// Added after the failure multiplier
    pub failure_increment: Duration,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self::from(&ThrottleConfig::default())
    }
}

impl From<&ThrottleConfig> for ThrottlePolicy {
    fn from(config: &ThrottleConfig) -> Self {
        Self {
            min_delay: secs_to_duration(config.min_delay),
            max_delay: secs_to_duration(config.max_delay),
            success_factor: config.success_factor,
            failure_factor: config.failure_factor,
            failure_increment: secs_to_duration(config.failure_increment),
        }
    }
}

/// Mutable throttle state
///
/// `min_delay <= current_delay <= max_delay` holds after every operation.
#[derive(Debug, Clone)]
pub struct ThrottleState {
    policy: ThrottlePolicy,
    current_delay: Duration,
    last_request: Option<Instant>,
}

impl ThrottleState {
    /// Creates a state starting at the policy floor
    pub fn new(policy: ThrottlePolicy) -> Self {
        Self {
            current_delay: policy.min_delay,
            policy,
            last_request: None,
        }
    }

    /// Creates a state with a specific starting delay, clamped into bounds
    pub fn with_delay(policy: ThrottlePolicy, delay: Duration) -> Self {
        let mut state = Self::new(policy);
        state.current_delay = state.clamp(delay);
        state
    }

    pub fn policy(&self) -> &ThrottlePolicy {
        &self.policy
    }

    pub fn current_delay(&self) -> Duration {
        self.current_delay
    }

    pub fn last_request(&self) -> Option<Instant> {
        self.last_request
    }

    /// Decays the delay toward the floor
    pub fn record_success(&mut self) {
        let next = self.scaled(self.policy.success_factor);
        self.current_delay = self.clamp(next);
    }

    /// Grows the delay toward the ceiling
    pub fn record_failure(&mut self) {
        let next = self
            .scaled(self.policy.failure_factor)
            .saturating_add(self.policy.failure_increment);
        self.current_delay = self.clamp(next);
    }

    /// Applies the outcome of one request
    pub fn feedback(&mut self, success: bool) {
        if success {
            self.record_success();
        } else {
            self.record_failure();
        }
    }

    /// Time still to wait at `now` before the next request may go out
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last_request {
            Some(last) => self
                .current_delay
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Marks `now` as the time of the latest request
    pub fn mark_request(&mut self, now: Instant) {
        self.last_request = Some(now);
    }

    /// Current delay times `factor`, saturating at the ceiling on overflow
    fn scaled(&self, factor: f64) -> Duration {
        Duration::try_from_secs_f64(self.current_delay.as_secs_f64() * factor)
            .unwrap_or(self.policy.max_delay)
    }

    fn clamp(&self, delay: Duration) -> Duration {
        delay.clamp(self.policy.min_delay, self.policy.max_delay)
    }
}

/// Shared handle to one adaptive throttle
///
/// Clones share the same state, so several fetch clients can be made to
/// cooperate under one policy. Independent throttles come from separate
/// calls to [`Throttle::new`].
#[derive(Debug, Clone)]
pub struct Throttle {
    state: Arc<Mutex<ThrottleState>>,
}

impl Throttle {
    pub fn new(policy: ThrottlePolicy) -> Self {
        Self::from_state(ThrottleState::new(policy))
    }

    pub fn from_state(state: ThrottleState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Waits until the current delay has elapsed since the last request,
    /// then records the moment of resumption as the new last request.
    ///
    /// The lock is not held while sleeping; a caller may therefore resume
    /// inside a window opened by another caller that resumed meanwhile.
    pub async fn wait(&self) {
        let remaining = {
            let state = self.state.lock().await;
            state.remaining(Instant::now())
        };

        if !remaining.is_zero() {
            tracing::trace!(wait_ms = remaining.as_millis() as u64, "Throttling request");
            tokio::time::sleep(remaining).await;
        }

        self.state.lock().await.mark_request(Instant::now());
    }

    /// Feeds the outcome of a request back into the delay
    pub async fn feedback(&self, success: bool) {
        let mut state = self.state.lock().await;
        let before = state.current_delay();
        state.feedback(success);
        tracing::trace!(
            success,
            before_ms = before.as_millis() as u64,
            after_ms = state.current_delay().as_millis() as u64,
            "Throttle delay updated"
        );
    }

    pub async fn current_delay(&self) -> Duration {
        self.state.lock().await.current_delay()
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> ThrottleState {
        self.state.lock().await.clone()
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(ThrottlePolicy::default())
    }
}
