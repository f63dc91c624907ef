//! Response classification and the per-URL retry state machine
//!
//! A fetch moves through `Attempting(i)` and, after each classified
//! outcome, into one of `Succeeded`, `Retrying(i + 1)`, `Exhausted` or
//! `Rejected`. The transitions are pure so they can be tested without any
//! network I/O.

use crate::client::transport::{TransportError, TransportResponse};
use std::fmt;
use std::time::Duration;

/// One attempt of one fetch call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchAttempt<'a> {
    pub url: &'a str,
    /// Zero-based attempt index
    pub attempt_number: usize,
    /// Extra backoff slept before the request goes out
    pub delay_before_attempt: Duration,
    pub proxy: Option<&'a str>,
}

/// Why an attempt did not produce a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// No response within the per-attempt timeout
    Timeout,

    /// Connection, TLS, or body read failure
    Transport(String),

    /// HTTP 5xx
    ServerError(u16),

    /// HTTP 403 or 429: the target is pushing back
    Blocked(u16),

    /// The client can no longer issue requests
    ClientClosed,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::Transport(msg) => write!(f, "{}", msg),
            Self::ServerError(status) => write!(f, "server error (HTTP {})", status),
            Self::Blocked(status) => write!(f, "blocked (HTTP {})", status),
            Self::ClientClosed => write!(f, "fetch client closed"),
        }
    }
}

/// Classified result of a single attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(String),
    RetryableFailure(FailureReason),
    TerminalFailure(FailureReason),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Returns true for statuses the target uses to signal active blocking
pub fn is_block_status(status: u16) -> bool {
    status == 403 || status == 429
}

/// Classifies a transport result
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | Transport error / timeout | Retryable |
/// | HTTP 5xx | Retryable |
/// | HTTP 403, 429 | Retryable |
/// | Anything else | Success |
///
/// The body of a successful response is not inspected.
pub fn classify(result: Result<TransportResponse, TransportError>) -> FetchOutcome {
    match result {
        Err(TransportError::Timeout) => FetchOutcome::RetryableFailure(FailureReason::Timeout),
        Err(e) => FetchOutcome::RetryableFailure(FailureReason::Transport(e.to_string())),
        Ok(response) if response.status >= 500 => {
            FetchOutcome::RetryableFailure(FailureReason::ServerError(response.status))
        }
        Ok(response) if is_block_status(response.status) => {
            FetchOutcome::RetryableFailure(FailureReason::Blocked(response.status))
        }
        Ok(response) => FetchOutcome::Success(response.body),
    }
}

/// Position of a fetch call in its retry schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// Attempt `i` is in progress
    Attempting(usize),

    /// Attempt `i - 1` failed; attempt `i` is next
    Retrying(usize),

    /// An attempt succeeded
    Succeeded,

    /// Every attempt failed
    Exhausted { attempts: usize },

    /// An attempt failed in a way retrying cannot fix
    Rejected,
}

impl RetryState {
    /// Initial state for a schedule of `total_attempts` attempts
    pub fn start(total_attempts: usize) -> Self {
        if total_attempts == 0 {
            Self::Exhausted { attempts: 0 }
        } else {
            Self::Attempting(0)
        }
    }

    /// Moves past a classified outcome
    ///
    /// Only `Attempting` reacts to outcomes; every other state is returned
    /// unchanged.
    pub fn advance(self, outcome: &FetchOutcome, total_attempts: usize) -> Self {
        match self {
            Self::Attempting(i) => match outcome {
                FetchOutcome::Success(_) => Self::Succeeded,
                FetchOutcome::TerminalFailure(_) => Self::Rejected,
                FetchOutcome::RetryableFailure(_) if i + 1 < total_attempts => {
                    Self::Retrying(i + 1)
                }
                FetchOutcome::RetryableFailure(_) => Self::Exhausted { attempts: i + 1 },
            },
            other => other,
        }
    }

    /// Begins the pending retry; other states are returned unchanged
    pub fn resume(self) -> Self {
        match self {
            Self::Retrying(i) => Self::Attempting(i),
            other => other,
        }
    }

    /// Returns true once no further attempt will be made
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Exhausted { .. } | Self::Rejected
        )
    }
}

impl fmt::Display for RetryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attempting(i) => write!(f, "attempting({})", i),
            Self::Retrying(i) => write!(f, "retrying({})", i),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Exhausted { attempts } => write!(f, "exhausted({})", attempts),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(status: u16) -> Result<TransportResponse, TransportError> {
        Ok(TransportResponse::new(status, "<html></html>"))
    }

    #[test]
    fn test_classify_success_statuses() {
        for status in [200, 201, 204, 301, 302, 304, 400, 404, 410] {
            assert!(classify(ok(status)).is_success(), "status {}", status);
        }
    }

    #[test]
    fn test_classify_keeps_body() {
        let outcome = classify(Ok(TransportResponse::new(200, "page body")));
        assert_eq!(outcome, FetchOutcome::Success("page body".to_string()));
    }

    #[test]
    fn test_classify_server_errors() {
        for status in [500, 502, 503, 504, 599] {
            assert_eq!(
                classify(ok(status)),
                FetchOutcome::RetryableFailure(FailureReason::ServerError(status))
            );
        }
    }

    #[test]
    fn test_classify_block_statuses_are_retryable() {
        assert_eq!(
            classify(ok(429)),
            FetchOutcome::RetryableFailure(FailureReason::Blocked(429))
        );
        assert_eq!(
            classify(ok(403)),
            FetchOutcome::RetryableFailure(FailureReason::Blocked(403))
        );
    }

    #[test]
    fn test_classify_transport_errors() {
        assert_eq!(
            classify(Err(TransportError::Timeout)),
            FetchOutcome::RetryableFailure(FailureReason::Timeout)
        );
        assert!(matches!(
            classify(Err(TransportError::Connect("refused".to_string()))),
            FetchOutcome::RetryableFailure(FailureReason::Transport(_))
        ));
    }

    #[test]
    fn test_start() {
        assert_eq!(RetryState::start(5), RetryState::Attempting(0));
        assert_eq!(RetryState::start(0), RetryState::Exhausted { attempts: 0 });
    }

    #[test]
    fn test_success_transition() {
        let outcome = FetchOutcome::Success(String::new());
        assert_eq!(
            RetryState::Attempting(2).advance(&outcome, 5),
            RetryState::Succeeded
        );
    }

    #[test]
    fn test_retry_then_exhaust() {
        let outcome = FetchOutcome::RetryableFailure(FailureReason::Blocked(429));
        let total = 3;

        let mut state = RetryState::start(total);
        let mut attempts = 0;
        while let RetryState::Attempting(_) = state {
            attempts += 1;
            state = state.advance(&outcome, total).resume();
        }

        assert_eq!(attempts, total);
        assert_eq!(state, RetryState::Exhausted { attempts: total });
        assert!(state.is_terminal());
    }

    #[test]
    fn test_retrying_points_at_next_attempt() {
        let outcome = FetchOutcome::RetryableFailure(FailureReason::ServerError(503));
        let state = RetryState::Attempting(0).advance(&outcome, 5);
        assert_eq!(state, RetryState::Retrying(1));
        assert!(!state.is_terminal());
        assert_eq!(state.resume(), RetryState::Attempting(1));
    }

    #[test]
    fn test_terminal_failure_rejects() {
        let outcome = FetchOutcome::TerminalFailure(FailureReason::ClientClosed);
        assert_eq!(
            RetryState::Attempting(0).advance(&outcome, 5),
            RetryState::Rejected
        );
    }

    #[test]
    fn test_terminal_states_ignore_outcomes() {
        let outcome = FetchOutcome::Success(String::new());
        assert_eq!(
            RetryState::Rejected.advance(&outcome, 5),
            RetryState::Rejected
        );
        assert_eq!(
            RetryState::Exhausted { attempts: 5 }.advance(&outcome, 5),
            RetryState::Exhausted { attempts: 5 }
        );
        assert_eq!(RetryState::Succeeded.resume(), RetryState::Succeeded);
    }

    #[test]
    fn test_display() {
        assert_eq!(RetryState::Attempting(1).to_string(), "attempting(1)");
        assert_eq!(
            RetryState::Exhausted { attempts: 5 }.to_string(),
            "exhausted(5)"
        );
        assert_eq!(FailureReason::Blocked(429).to_string(), "blocked (HTTP 429)");
    }
}
