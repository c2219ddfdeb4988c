//! Session context threaded through the orchestrator and step pipeline.
//!
//! Holds the selected cloud/controller/model, the environment overlay handed
//! to external scripts, and the data collected from steps. One `Session`
//! exists per run; components receive it explicitly instead of reaching for
//! process globals.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Provider type tag visible to step scripts.
pub const ENV_PROVIDER_TYPE: &str = "JUJU_PROVIDERTYPE";
/// Credential name (empty when the cloud has none).
pub const ENV_CREDENTIAL: &str = "JUJU_CREDENTIAL";
pub const ENV_CONTROLLER: &str = "JUJU_CONTROLLER";
pub const ENV_MODEL: &str = "JUJU_MODEL";
/// Directory holding every spell.
pub const ENV_SPELLS_DIR: &str = "SUMMON_SPELLSDIR";

/// Per-step collected values: step name → field key → value.
pub type StepData = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub cloud: String,
    pub cloud_type: String,
    pub controller: String,
    pub model: String,
    pub region: Option<String>,
    pub credential: Option<String>,
    /// Operating against a shared multi-tenant controller.
    pub is_jaas: bool,
    /// Root directory holding all spells.
    pub spells_dir: PathBuf,
    /// Working directory of the selected spell.
    pub spell_dir: PathBuf,
    /// Model config passed to bootstrap and add-model.
    pub model_defaults: BTreeMap<String, String>,
    /// Environment overlay applied to every spawned step script.
    pub env: BTreeMap<String, String>,
    pub step_data: StepData,
    /// Privileged password captured from a step that asked for one.
    pub elevated_credential: Option<String>,
}

impl Session {
    /// Cloud identifier passed to the backend: `cloud` or `cloud/region`.
    #[must_use]
    pub fn cloud_with_region(&self) -> String {
        match self.region.as_deref() {
            Some(region) if !region.is_empty() => format!("{}/{region}", self.cloud),
            _ => self.cloud.clone(),
        }
    }

    /// `controller:model` selector used by backend commands.
    #[must_use]
    pub fn model_selector(&self) -> String {
        format!("{}:{}", self.controller, self.model)
    }

    /// Path of the error log the backend writes when bootstrap fails.
    #[must_use]
    pub fn bootstrap_log(&self) -> PathBuf {
        self.spell_dir
            .join(format!("{}-bootstrap.err", self.controller))
    }

    pub fn set_env(&mut self, key: &str, value: impl Into<String>) {
        self.env.insert(key.to_string(), value.into());
    }
}
