//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::HealthwatchConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for environment variable {var}")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a TOML file, apply process environment overrides, and validate.
pub fn load_config(path: &Path) -> Result<HealthwatchConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: HealthwatchConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto a parsed configuration.
///
/// `lookup` abstracts the environment so overrides can be exercised
/// without touching process state.
pub fn apply_env_overrides<F>(config: &mut HealthwatchConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("CHECK_INTERVAL_MINUTES") {
        config.monitor.check_interval_mins = parse_minutes("CHECK_INTERVAL_MINUTES", value)?;
    }
    if let Some(value) = lookup("ALERT_COOLDOWN_MINUTES") {
        config.monitor.cooldown_mins = parse_minutes("ALERT_COOLDOWN_MINUTES", value)?;
    }
    if let Some(value) = lookup("MAILGUN_API_KEY") {
        config.notifier.mailgun_api_key = value;
    }
    if let Some(value) = lookup("MAILGUN_DOMAIN") {
        config.notifier.mailgun_domain = value;
    }
    if let Some(value) = lookup("FROM_EMAIL") {
        config.notifier.from = value;
    }
    if let Some(value) = lookup("ADMIN_EMAILS") {
        config.notifier.recipients = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }
    if let Some(value) = lookup("HEALTHWATCH_STATE_FILE") {
        config.storage.state_file = value;
    }
    Ok(())
}

fn parse_minutes(var: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { var, value })
}
