//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;
use tokio::sync::oneshot;

use crate::domain::config::SummonConfig;
use crate::domain::step::{Step, StepInput};

/// Environment overlay handed to spawned processes.
pub type EnvOverlay = BTreeMap<String, String>;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Parameters for adding a model to an existing controller.
pub struct ModelRequest<'a> {
    pub model: &'a str,
    pub controller: &'a str,
    pub cloud: &'a str,
    pub credential: Option<&'a str>,
    /// Passed as `--config key=value`.
    pub defaults: &'a BTreeMap<String, String>,
}

/// Parameters for bootstrapping a new controller.
pub struct BootstrapRequest<'a> {
    pub controller: &'a str,
    /// `cloud` or `cloud/region`.
    pub cloud: &'a str,
    /// Name of the default model created alongside the controller.
    pub model: &'a str,
    pub credential: Option<&'a str>,
    pub defaults: &'a BTreeMap<String, String>,
    /// Where the backend's stderr is written on failure.
    pub error_log: &'a Path,
}

/// Connection metadata for a freshly logged-in model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub provider_type: String,
}

/// vSphere endpoint and user credentials.
#[derive(Debug, Clone)]
pub struct VsphereLogin {
    pub endpoint: String,
    pub user: String,
    pub password: String,
}

/// Result of a login attempt that reached the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Accepted,
    Rejected(String),
}

// ── Backend Port Traits ───────────────────────────────────────────────────────

/// Read-only queries against the backend's client store.
#[allow(async_fn_in_trait)]
pub trait ControllerRegistry {
    /// Names of every controller the backend knows.
    async fn controllers(&self) -> Result<Vec<String>>;
    /// Cloud name → cloud type tag.
    async fn cloud_types_by_name(&self) -> Result<BTreeMap<String, String>>;
    /// Stored credential attributes for `cloud`/`name`.
    async fn credential(&self, cloud: &str, name: &str) -> Result<BTreeMap<String, String>>;
}

/// Operations that create infrastructure.
#[allow(async_fn_in_trait)]
pub trait ModelProvisioner {
    async fn add_model(&self, req: &ModelRequest<'_>) -> Result<()>;
    /// Run bootstrap. `Ok(false)` means the backend reported failure and
    /// wrote its diagnostics to `req.error_log`.
    async fn bootstrap(&self, req: &BootstrapRequest<'_>) -> Result<bool>;
    /// Authenticate against `controller:model` and return its metadata.
    async fn login(&self, controller: &str, model: &str) -> Result<ModelInfo>;
}

/// Composite trait: any type implementing both sub-traits is a `Backend`.
pub trait Backend: ControllerRegistry + ModelProvisioner {}

impl<T> Backend for T where T: ControllerRegistry + ModelProvisioner {}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
    /// Run a program with stdin piped from `stdin`.
    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output>;
    /// Run a program with `env` added to the inherited environment.
    async fn run_with_env(&self, program: &str, args: &[&str], env: &EnvOverlay)
    -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Message-emission sink for user-visible progress. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Step Ports ────────────────────────────────────────────────────────────────

/// Runs a step's external script under the session environment.
#[allow(async_fn_in_trait)]
pub trait StepScripts {
    /// Run the script for `step`, if the spell ships one.
    ///
    /// Returns the script's result message, or `None` when no script exists.
    async fn run_step(&self, step: &Step, env: &EnvOverlay) -> Result<Option<String>>;
}

/// Presents a step to the user.
///
/// The view signals completion by sending the collected input on
/// `complete`. Dropping the sender cancels the step.
pub trait StepView {
    fn render(&self, step: &Step, complete: oneshot::Sender<StepInput>);
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

#[allow(async_fn_in_trait)]
pub trait LocalFs {
    async fn read_to_string(&self, path: &Path) -> Result<String>;
}

// ── Provider Session Port ─────────────────────────────────────────────────────

/// vSphere API access used by provider login.
#[allow(async_fn_in_trait)]
pub trait DatacenterClient {
    /// Attempt to log in. `Err` means the API could not be reached.
    async fn login(&self, login: &VsphereLogin) -> Result<LoginOutcome>;
    /// Datacenter names visible to the logged-in user.
    async fn datacenters(&self, login: &VsphereLogin) -> Result<Vec<String>>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading and saving the user configuration.
pub trait ConfigStore {
    /// Load the config, returning defaults when no file exists.
    fn load(&self) -> Result<SummonConfig>;
    fn save(&self, config: &SummonConfig) -> Result<()>;
    fn path(&self) -> Result<PathBuf>;
}
