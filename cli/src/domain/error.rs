//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Schema errors ─────────────────────────────────────────────────────────────

/// The requested cloud type has no registered provider schema.
#[derive(Debug, Error, PartialEq, Eq)]
#[error(
    "Unable to find credentials for {0}, you can double check what credentials you \
     do have available by running `juju credentials`. Please see `juju help \
     add-credential` for more information."
)]
pub struct SchemaError(pub String);

// ── Provider errors ───────────────────────────────────────────────────────────

/// Errors raised by provider capabilities (tools, login, cloud definitions).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider API rejected the supplied credentials.
    #[error("Invalid login for {endpoint}: {reason}")]
    InvalidLogin { endpoint: String, reason: String },

    /// `cloud_config()` was called on a provider that only supplies credentials.
    /// This is a caller bug, never a user error.
    #[error("provider '{0}' does not define a cloud configuration")]
    CloudConfigUnsupported(&'static str),

    /// The provider needs an authenticated session before this call.
    #[error("provider '{0}' is not logged in")]
    NotAuthenticated(&'static str),

    /// A third-party tool exited non-zero.
    #[error("{tool} failed: {stderr}")]
    ToolFailed { tool: String, stderr: String },

    /// A credential name or key needed by the provider was not available.
    #[error("missing credential: {0}")]
    MissingCredential(String),
}

// ── Bootstrap errors ──────────────────────────────────────────────────────────

/// Fatal errors from the bootstrap orchestrator.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The backend bootstrap command failed. `log_tail` holds the last lines
    /// of `<controller>-bootstrap.err` and is printed beneath the headline.
    #[error("Unable to bootstrap (cloud type: {cloud_type}){}", indented(log_tail))]
    Failed {
        cloud_type: String,
        log_tail: Vec<String>,
    },

    /// The selected cloud is not known to the backend.
    #[error("Cloud '{0}' is not known to the backend. Run `juju clouds` to list clouds.")]
    UnknownCloudType(String),
}

/// Log lines rendered as an indented block below an error headline.
fn indented(lines: &[String]) -> String {
    lines.iter().map(|line| format!("\n    {line}")).collect()
}

// ── Action errors ─────────────────────────────────────────────────────────────

/// Errors that terminate a single remote action invocation.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Could not determine action id for {action} on {unit}")]
    MissingActionId { unit: String, action: String },

    #[error(
        "Action {action} failed on {unit}, please have a look at `juju show-action-status`"
    )]
    Failed { unit: String, action: String },

    #[error(
        "There is an unknown issue with running {action} on {unit}, please have a look at \
         `juju show-action-status`"
    )]
    UnknownIssue { unit: String, action: String },

    /// The backend exited non-zero; `stderr` is its trimmed diagnostic.
    #[error("{command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

// ── Pipeline errors ───────────────────────────────────────────────────────────

/// Errors from the step execution pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// The completion channel for a step closed before it was signalled.
    #[error("Step '{0}' was cancelled before completion")]
    Cancelled(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\n{hint}")]
    InvalidValue {
        key: String,
        value: String,
        hint: String,
    },
}
