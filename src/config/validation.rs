//! Configuration validation.
//!
//! Serde handles syntax; this checks semantics. All problems are
//! collected, not just the first one.

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{HealthwatchConfig, MAX_MINUTES};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("service #{0} has an empty id")]
    EmptyServiceId(usize),

    #[error("service id '{0}' is not a valid container name")]
    InvalidServiceId(String),

    #[error("service id '{0}' is declared more than once")]
    DuplicateServiceId(String),

    #[error("service '{id}' has an invalid http_check URL '{url}'")]
    InvalidProbeUrl { id: String, url: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        field: &'static str,
        value: u64,
        max: u64,
    },

    #[error("readiness.ready_ratio must be in (0, 1], got {0}")]
    ReadyRatio(String),

    #[error("dashboard.bind_address '{0}' is not a socket address")]
    BindAddress(String),
}

/// `[a-zA-Z0-9][a-zA-Z0-9_.-]*`, the engine's container name alphabet.
/// Ids go into request paths verbatim.
fn is_container_name(id: &str) -> bool {
    let mut chars = id.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// Validate a parsed configuration.
pub fn validate_config(config: &HealthwatchConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for (i, service) in config.services.iter().enumerate() {
        if service.id.trim().is_empty() {
            errors.push(ValidationError::EmptyServiceId(i));
            continue;
        }
        if !is_container_name(&service.id) {
            errors.push(ValidationError::InvalidServiceId(service.id.clone()));
        }
        if !seen.insert(service.id.as_str()) {
            errors.push(ValidationError::DuplicateServiceId(service.id.clone()));
        }
        if let Some(raw) = &service.http_check {
            let valid = url::Url::parse(raw)
                .map(|u| u.scheme() == "http" && u.host().is_some())
                .unwrap_or(false);
            if !valid {
                errors.push(ValidationError::InvalidProbeUrl {
                    id: service.id.clone(),
                    url: raw.clone(),
                });
            }
        }
    }

    let non_zero = [
        ("monitor.check_interval_mins", config.monitor.check_interval_mins),
        ("monitor.cooldown_mins", config.monitor.cooldown_mins),
        ("runtime.probe_timeout_secs", config.runtime.probe_timeout_secs),
        ("runtime.http_timeout_secs", config.runtime.http_timeout_secs),
        ("notifier.send_timeout_secs", config.notifier.send_timeout_secs),
        ("readiness.poll_interval_secs", config.readiness.poll_interval_secs),
    ];
    for (name, value) in non_zero {
        if value == 0 {
            errors.push(ValidationError::Zero(name));
        }
    }

    let minutes = [
        ("monitor.check_interval_mins", config.monitor.check_interval_mins),
        ("monitor.cooldown_mins", config.monitor.cooldown_mins),
    ];
    for (field, value) in minutes {
        if value > MAX_MINUTES {
            errors.push(ValidationError::TooLarge {
                field,
                value,
                max: MAX_MINUTES,
            });
        }
    }

    let ratio = config.readiness.ready_ratio;
    if !(ratio > 0.0 && ratio <= 1.0) {
        errors.push(ValidationError::ReadyRatio(ratio.to_string()));
    }

    if config.dashboard.enabled && config.dashboard.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.dashboard.bind_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
