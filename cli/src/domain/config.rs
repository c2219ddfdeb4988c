//! Domain types and validators for Summon configuration.
//!
//! Pure functions only. No I/O, no async, no filesystem access.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "backend.binary",
    "backend.command-timeout-secs",
    "backend.bootstrap-timeout-secs",
    "actions.poll-interval-secs",
];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.summon/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SummonConfig {
    pub backend: BackendConfig,
    pub actions: ActionsConfig,
}

/// How the orchestration backend binary is invoked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct BackendConfig {
    /// Backend executable, looked up on `PATH`.
    pub binary: String,
    pub command_timeout_secs: u64,
    pub bootstrap_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            binary: "juju".to_string(),
            command_timeout_secs: 30,
            bootstrap_timeout_secs: 3600,
        }
    }
}

impl BackendConfig {
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    #[must_use]
    pub fn bootstrap_timeout(&self) -> Duration {
        Duration::from_secs(self.bootstrap_timeout_secs)
    }
}

/// Remote action polling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ActionsConfig {
    pub poll_interval_secs: u64,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
        }
    }
}

impl ActionsConfig {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |hint: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        hint: hint.to_string(),
    };
    match key {
        "backend.binary" if value.trim().is_empty() => {
            Err(invalid("Expected a program name or path").into())
        }
        "backend.command-timeout-secs"
        | "backend.bootstrap-timeout-secs"
        | "actions.poll-interval-secs" => match value.parse::<u64>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err(invalid("Expected a positive number of seconds").into()),
        },
        _ => Ok(()),
    }
}

/// Apply a validated `key = value` to the config.
///
/// # Errors
///
/// Returns an error if the key or value is invalid.
pub fn apply_config_value(config: &mut SummonConfig, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;
    let secs = || value.parse::<u64>().unwrap_or_default();
    match key {
        "backend.binary" => config.backend.binary = value.to_string(),
        "backend.command-timeout-secs" => config.backend.command_timeout_secs = secs(),
        "backend.bootstrap-timeout-secs" => config.backend.bootstrap_timeout_secs = secs(),
        "actions.poll-interval-secs" => config.actions.poll_interval_secs = secs(),
        _ => anyhow::bail!("Unknown setting: {key}"),
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
