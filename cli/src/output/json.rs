//! JSON output helpers for `--json` code paths.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::status::EntityState;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

#[derive(Serialize)]
struct StatusJson<'a> {
    units: &'a [EntityState],
    machines: &'a [EntityState],
}

/// Format unit and machine states as a JSON document.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_status(units: &[EntityState], machines: &[EntityState]) -> Result<String> {
    serde_json::to_string_pretty(&StatusJson { units, machines })
        .context("JSON serialization failed")
}
