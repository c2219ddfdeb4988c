//! Shared test helpers: fake port implementations and output constructors.

#![allow(dead_code, clippy::expect_used)]

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use summon_cli::application::ports::{
    BootstrapRequest, CommandRunner, ControllerRegistry, DatacenterClient, EnvOverlay, LocalFs,
    LoginOutcome, ModelInfo, ModelProvisioner, ModelRequest, ProgressReporter, StepScripts,
    VsphereLogin,
};
use summon_cli::domain::step::Step;

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
/// On Windows `ExitStatusExt::from_raw` takes the exit code directly.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Scripted command runner ──────────────────────────────────────────────────

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<Vec<u8>>,
    pub env: EnvOverlay,
    pub timeout: Option<Duration>,
}

/// Replays canned outputs in order and records every call.
///
/// Cloning shares the queue and the call log, so a test can keep a handle
/// after moving the runner into the code under test.
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    responses: Arc<Mutex<VecDeque<Output>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedRunner {
    pub fn new(responses: impl IntoIterator<Item = Output>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().collect())),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("lock").clone()
    }

    fn next(&self, call: Call) -> Result<Output> {
        let args = call.args.join(" ");
        self.calls.lock().expect("lock").push(call);
        self.responses
            .lock()
            .expect("lock")
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("unexpected command: {args}"))
    }
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(ToString::to_string).collect()
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.next(Call {
            program: program.to_string(),
            args: strings(args),
            stdin: None,
            env: EnvOverlay::new(),
            timeout: None,
        })
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        self.next(Call {
            program: program.to_string(),
            args: strings(args),
            stdin: None,
            env: EnvOverlay::new(),
            timeout: Some(timeout),
        })
    }

    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output> {
        self.next(Call {
            program: program.to_string(),
            args: strings(args),
            stdin: Some(stdin.to_vec()),
            env: EnvOverlay::new(),
            timeout: None,
        })
    }

    async fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &EnvOverlay,
    ) -> Result<Output> {
        self.next(Call {
            program: program.to_string(),
            args: strings(args),
            stdin: None,
            env: env.clone(),
            timeout: None,
        })
    }
}

// ── Fake backend ─────────────────────────────────────────────────────────────

/// In-memory backend recording every provisioning call.
#[derive(Default)]
pub struct FakeBackend {
    pub controllers: Vec<String>,
    pub cloud_types: BTreeMap<String, String>,
    pub credentials: BTreeMap<(String, String), BTreeMap<String, String>>,
    pub bootstrap_ok: bool,
    pub add_model_error: Option<String>,
    pub provider_type: String,
    pub log: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn log(&self) -> Vec<String> {
        self.log.lock().expect("lock").clone()
    }

    fn record(&self, entry: String) {
        self.log.lock().expect("lock").push(entry);
    }
}

impl ControllerRegistry for FakeBackend {
    async fn controllers(&self) -> Result<Vec<String>> {
        Ok(self.controllers.clone())
    }

    async fn cloud_types_by_name(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.cloud_types.clone())
    }

    async fn credential(&self, cloud: &str, name: &str) -> Result<BTreeMap<String, String>> {
        self.credentials
            .get(&(cloud.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no credential {name}"))
    }
}

impl ModelProvisioner for FakeBackend {
    async fn add_model(&self, req: &ModelRequest<'_>) -> Result<()> {
        self.record(format!(
            "add-model {} {} {} {:?}",
            req.model, req.cloud, req.controller, req.credential
        ));
        match &self.add_model_error {
            Some(msg) => anyhow::bail!("{msg}"),
            None => Ok(()),
        }
    }

    async fn bootstrap(&self, req: &BootstrapRequest<'_>) -> Result<bool> {
        self.record(format!(
            "bootstrap {} {} {} log={}",
            req.cloud,
            req.controller,
            req.model,
            req.error_log.display()
        ));
        Ok(self.bootstrap_ok)
    }

    async fn login(&self, controller: &str, model: &str) -> Result<ModelInfo> {
        self.record(format!("login {controller}:{model}"));
        Ok(ModelInfo {
            provider_type: self.provider_type.clone(),
        })
    }
}

// ── Fake step scripts ────────────────────────────────────────────────────────

/// Records each script run with the environment it saw.
#[derive(Default)]
pub struct FakeScripts {
    pub messages: BTreeMap<String, String>,
    pub runs: Mutex<Vec<(String, EnvOverlay)>>,
}

impl FakeScripts {
    pub fn runs(&self) -> Vec<(String, EnvOverlay)> {
        self.runs.lock().expect("lock").clone()
    }
}

impl StepScripts for FakeScripts {
    async fn run_step(&self, step: &Step, env: &EnvOverlay) -> Result<Option<String>> {
        self.runs
            .lock()
            .expect("lock")
            .push((step.filename.clone(), env.clone()));
        Ok(self.messages.get(&step.filename).cloned())
    }
}

// ── Fake filesystem ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeFs {
    pub files: BTreeMap<PathBuf, String>,
}

impl LocalFs for FakeFs {
    async fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such file: {}", path.display()))
    }
}

// ── Recording reporter ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    pub events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("lock").clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.events.lock().expect("lock").push(format!("step:{message}"));
    }
    fn success(&self, message: &str) {
        self.events
            .lock()
            .expect("lock")
            .push(format!("success:{message}"));
    }
    fn warn(&self, message: &str) {
        self.events.lock().expect("lock").push(format!("warn:{message}"));
    }
}

// ── Fake vSphere API ─────────────────────────────────────────────────────────

pub struct FakeDatacenters {
    pub outcome: LoginOutcome,
    pub datacenters: Vec<String>,
    pub logins: Mutex<u32>,
}

impl FakeDatacenters {
    pub fn accepting(datacenters: &[&str]) -> Self {
        Self {
            outcome: LoginOutcome::Accepted,
            datacenters: datacenters.iter().map(ToString::to_string).collect(),
            logins: Mutex::new(0),
        }
    }

    pub fn rejecting(reason: &str) -> Self {
        Self {
            outcome: LoginOutcome::Rejected(reason.to_string()),
            datacenters: Vec::new(),
            logins: Mutex::new(0),
        }
    }

    pub fn login_count(&self) -> u32 {
        *self.logins.lock().expect("lock")
    }
}

impl DatacenterClient for FakeDatacenters {
    async fn login(&self, _login: &VsphereLogin) -> Result<LoginOutcome> {
        *self.logins.lock().expect("lock") += 1;
        Ok(self.outcome.clone())
    }

    async fn datacenters(&self, _login: &VsphereLogin) -> Result<Vec<String>> {
        Ok(self.datacenters.clone())
    }
}
