use crate::config::types::{Config, FetchConfig, OutputConfig, ThrottleConfig};
use crate::ConfigError;
use std::time::Duration;

/// Smallest per-request timeout accepted (seconds)
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_throttle_config(&config.throttle)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.max_concurrency < 1 {
        return Err(ConfigError::Validation(format!(
            "max-concurrency must be >= 1, got {}",
            config.max_concurrency
        )));
    }

    if let Some(limit) = config.dispatch_concurrency {
        if limit < 1 {
            return Err(ConfigError::Validation(format!(
                "dispatch-concurrency must be >= 1, got {}",
                limit
            )));
        }
    }

    if config.request_timeout_secs < MIN_REQUEST_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= {}, got {}",
            MIN_REQUEST_TIMEOUT_SECS, config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    validate_retry_delays(&config.retry_delays)?;

    Ok(())
}

fn validate_retry_delays(delays: &[f64]) -> Result<(), ConfigError> {
    if delays.is_empty() {
        return Err(ConfigError::Validation(
            "retry-delays must contain at least one entry".to_string(),
        ));
    }

    for delay in delays {
        if !delay.is_finite() || *delay < 0.0 {
            return Err(ConfigError::Validation(format!(
                "retry-delays entries must be finite and >= 0, got {}",
                delay
            )));
        }

        if Duration::try_from_secs_f64(*delay).is_err() {
            return Err(ConfigError::Validation(format!(
                "retry-delays entry {} is too large",
                delay
            )));
        }
    }

    Ok(())
}

fn validate_throttle_config(config: &ThrottleConfig) -> Result<(), ConfigError> {
    let finite = [
        config.min_delay,
        config.max_delay,
        config.success_factor,
        config.failure_factor,
        config.failure_increment,
    ]
    .iter()
    .all(|v| v.is_finite());

    if !finite {
        return Err(ConfigError::Validation(
            "throttle values must be finite numbers".to_string(),
        ));
    }

    if config.min_delay <= 0.0 || config.min_delay > config.max_delay {
        return Err(ConfigError::Validation(format!(
            "throttle delays must satisfy 0 < min-delay <= max-delay, got {} and {}",
            config.min_delay, config.max_delay
        )));
    }

    if config.success_factor <= 0.0 || config.success_factor > 1.0 {
        return Err(ConfigError::Validation(format!(
            "success-factor must be in (0, 1], got {}",
            config.success_factor
        )));
    }

    if config.failure_factor < 1.0 {
        return Err(ConfigError::Validation(format!(
            "failure-factor must be >= 1, got {}",
            config.failure_factor
        )));
    }

    if config.failure_increment < 0.0 {
        return Err(ConfigError::Validation(format!(
            "failure-increment must be >= 0, got {}",
            config.failure_increment
        )));
    }

    // The largest delay growth step must still be a valid Duration
    let peak = config.max_delay * config.failure_factor + config.failure_increment;
    if Duration::try_from_secs_f64(peak).is_err() {
        return Err(ConfigError::Validation(format!(
            "max-delay * failure-factor + failure-increment is out of range ({})",
            peak
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
