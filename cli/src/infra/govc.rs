//! vSphere API access through the `govc` CLI.

use anyhow::Result;

use crate::application::ports::{
    CommandRunner, DatacenterClient, EnvOverlay, LoginOutcome, VsphereLogin,
};

/// `DatacenterClient` backed by `govc`.
pub struct GovcClient<R> {
    runner: R,
    binary: String,
}

impl<R: CommandRunner> GovcClient<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            binary: "govc".to_string(),
        }
    }
}

fn govc_env(login: &VsphereLogin) -> EnvOverlay {
    [
        ("GOVC_URL", login.endpoint.as_str()),
        ("GOVC_USERNAME", login.user.as_str()),
        ("GOVC_PASSWORD", login.password.as_str()),
        ("GOVC_INSECURE", "1"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Datacenter names from `govc ls /` output (`/DC1`, `/DC2`, ...).
fn parse_datacenters(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(|l| l.trim().trim_start_matches('/'))
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

impl<R: CommandRunner> DatacenterClient for GovcClient<R> {
    async fn login(&self, login: &VsphereLogin) -> Result<LoginOutcome> {
        let output = self
            .runner
            .run_with_env(&self.binary, &["about"], &govc_env(login))
            .await?;
        if output.status.success() {
            return Ok(LoginOutcome::Accepted);
        }
        let reason = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Ok(LoginOutcome::Rejected(reason))
    }

    async fn datacenters(&self, login: &VsphereLogin) -> Result<Vec<String>> {
        let output = self
            .runner
            .run_with_env(&self.binary, &["ls", "/"], &govc_env(login))
            .await?;
        if !output.status.success() {
            anyhow::bail!(
                "govc ls failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(parse_datacenters(&String::from_utf8_lossy(&output.stdout)))
    }
}
