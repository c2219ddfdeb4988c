//! Backend adapter: implements `ControllerRegistry` and `ModelProvisioner`
//! by shelling out to the `juju` binary.

use std::collections::BTreeMap;
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::Value;

use crate::application::ports::{
    BootstrapRequest, CommandRunner, ControllerRegistry, ModelInfo, ModelProvisioner,
    ModelRequest,
};
use crate::domain::status::scalar_string;

/// Default backend bootstrap timeout.
pub const DEFAULT_BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(3600);

/// `juju` CLI backend.
pub struct JujuCli<R> {
    runner: R,
    binary: String,
    bootstrap_timeout: Duration,
}

#[derive(Debug, Default, Deserialize)]
struct ControllersDoc {
    #[serde(default)]
    controllers: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct CloudDoc {
    #[serde(rename = "type", default)]
    cloud_type: String,
}

#[derive(Debug, Default, Deserialize)]
struct CredentialsDoc {
    #[serde(rename = "local-credentials", alias = "credentials", default)]
    local: BTreeMap<String, BTreeMap<String, BTreeMap<String, Value>>>,
}

impl<R: CommandRunner> JujuCli<R> {
    pub fn new(runner: R, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
            bootstrap_timeout: DEFAULT_BOOTSTRAP_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_bootstrap_timeout(mut self, timeout: Duration) -> Self {
        self.bootstrap_timeout = timeout;
        self
    }

    /// Run `juju <args>` and return stdout, failing with stderr on non-zero exit.
    async fn stdout(&self, args: &[&str]) -> Result<String> {
        let output = self.runner.run(&self.binary, args).await?;
        check(&self.binary, args, &output)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn check(binary: &str, args: &[&str], output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let sub = args.first().copied().unwrap_or_default();
    anyhow::bail!("{binary} {sub} failed: {}", stderr.trim())
}

/// Append `--credential` and `--config key=value` flags.
fn push_model_flags(
    args: &mut Vec<String>,
    credential: Option<&str>,
    defaults: &BTreeMap<String, String>,
) {
    if let Some(cred) = credential {
        args.push("--credential".to_string());
        args.push(cred.to_string());
    }
    for (key, value) in defaults {
        args.push("--config".to_string());
        args.push(format!("{key}={value}"));
    }
}

fn add_model_args(req: &ModelRequest<'_>) -> Vec<String> {
    let mut args = vec![
        "add-model".to_string(),
        req.model.to_string(),
        req.cloud.to_string(),
        "--controller".to_string(),
        req.controller.to_string(),
    ];
    push_model_flags(&mut args, req.credential, req.defaults);
    args
}

fn bootstrap_args(req: &BootstrapRequest<'_>) -> Vec<String> {
    let mut args = vec![
        "bootstrap".to_string(),
        req.cloud.to_string(),
        req.controller.to_string(),
        "--default-model".to_string(),
        req.model.to_string(),
    ];
    push_model_flags(&mut args, req.credential, req.defaults);
    args
}

/// Provider type from a `show-model --format yaml` document.
fn parse_model_type(doc: &str) -> Option<String> {
    let value: Value = serde_yaml::from_str(doc).ok()?;
    value
        .as_mapping()?
        .values()
        .next()?
        .get("type")
        .and_then(scalar_string)
}

impl<R: CommandRunner> ControllerRegistry for JujuCli<R> {
    async fn controllers(&self) -> Result<Vec<String>> {
        let doc = self.stdout(&["controllers", "--format", "yaml"]).await?;
        // A fresh client prints nothing at all.
        if doc.trim().is_empty() {
            return Ok(Vec::new());
        }
        let parsed: ControllersDoc =
            serde_yaml::from_str(&doc).context("parsing controllers output")?;
        Ok(parsed.controllers.into_keys().collect())
    }

    async fn cloud_types_by_name(&self) -> Result<BTreeMap<String, String>> {
        let doc = self.stdout(&["clouds", "--format", "yaml"]).await?;
        let clouds: BTreeMap<String, CloudDoc> =
            serde_yaml::from_str(&doc).context("parsing clouds output")?;
        Ok(clouds
            .into_iter()
            .map(|(name, cloud)| (name, cloud.cloud_type))
            .collect())
    }

    async fn credential(&self, cloud: &str, name: &str) -> Result<BTreeMap<String, String>> {
        let doc = self
            .stdout(&["credentials", cloud, "--format", "yaml", "--show-secrets"])
            .await?;
        let parsed: CredentialsDoc =
            serde_yaml::from_str(&doc).context("parsing credentials output")?;
        let attrs = parsed
            .local
            .get(cloud)
            .and_then(|creds| creds.get(name))
            .with_context(|| format!("no credential '{name}' for cloud '{cloud}'"))?;
        Ok(attrs
            .iter()
            .filter_map(|(k, v)| scalar_string(v).map(|s| (k.clone(), s)))
            .collect())
    }
}

impl<R: CommandRunner> ModelProvisioner for JujuCli<R> {
    async fn add_model(&self, req: &ModelRequest<'_>) -> Result<()> {
        let args = add_model_args(req);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        tracing::debug!(?args, "adding model");
        self.stdout(&args).await.map(|_| ())
    }

    async fn bootstrap(&self, req: &BootstrapRequest<'_>) -> Result<bool> {
        let args = bootstrap_args(req);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        tracing::debug!(?args, "bootstrapping");
        let output = self
            .runner
            .run_with_timeout(&self.binary, &args, self.bootstrap_timeout)
            .await?;
        if output.status.success() {
            return Ok(true);
        }
        if let Some(parent) = req.error_log.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        tokio::fs::write(req.error_log, &output.stderr)
            .await
            .with_context(|| format!("writing {}", req.error_log.display()))?;
        Ok(false)
    }

    async fn login(&self, controller: &str, model: &str) -> Result<ModelInfo> {
        let selector = format!("{controller}:{model}");
        let doc = self
            .stdout(&["show-model", &selector, "--format", "yaml"])
            .await?;
        let provider_type = parse_model_type(&doc)
            .with_context(|| format!("no provider type reported for {selector}"))?;
        Ok(ModelInfo { provider_type })
    }
}
