//! Application service: provider tool setup and authenticated sessions.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};

use crate::application::ports::{
    CommandRunner, ControllerRegistry, DatacenterClient, LoginOutcome, VsphereLogin,
};
use crate::domain::error::ProviderError;
use crate::domain::provider::{CloudConfig, Provider, ProviderKind};
use crate::domain::session::Session;

/// Configure provider-specific third-party tools.
///
/// Only AWS has tooling today: the selected credential is written as a
/// named `aws` CLI profile. Every other provider is a no-op.
///
/// # Errors
///
/// Returns [`ProviderError::ToolFailed`] carrying the tool's stderr when it
/// exits non-zero, or an error if the credential cannot be read.
pub async fn configure_tools(
    provider: &Provider,
    session: &Session,
    registry: &impl ControllerRegistry,
    runner: &impl CommandRunner,
) -> Result<()> {
    match provider.kind() {
        ProviderKind::Aws => configure_aws_cli(session, registry, runner).await,
        _ => Ok(()),
    }
}

async fn configure_aws_cli(
    session: &Session,
    registry: &impl ControllerRegistry,
    runner: &impl CommandRunner,
) -> Result<()> {
    let name = session.credential.as_deref().ok_or_else(|| {
        ProviderError::MissingCredential(format!("no credential selected for {}", session.cloud))
    })?;
    let creds = registry
        .credential(&session.cloud, name)
        .await
        .with_context(|| format!("reading credential '{name}'"))?;
    let key = |k: &str| {
        creds
            .get(k)
            .cloned()
            .ok_or_else(|| ProviderError::MissingCredential(format!("{name}: {k}")))
    };
    let input = format!("{}\n{}\n\n\n", key("access-key")?, key("secret-key")?);

    let output = runner
        .run_with_stdin("aws", &["configure", "--profile", name], input.as_bytes())
        .await
        .context("failed to run aws configure")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::error!(profile = name, %stderr, "failed to configure AWS CLI profile");
        return Err(ProviderError::ToolFailed {
            tool: "aws configure".to_string(),
            stderr,
        }
        .into());
    }
    tracing::info!(profile = name, "configured AWS CLI profile");
    Ok(())
}

/// Log in to providers that expose an API session. Memoized: a provider
/// that is already authenticated is left untouched.
///
/// # Errors
///
/// Returns [`ProviderError::InvalidLogin`] when the API rejects the
/// credentials; any other error means the API could not be queried.
pub async fn login(provider: &mut Provider, client: &impl DatacenterClient) -> Result<()> {
    if provider.is_authenticated() || provider.kind() != ProviderKind::VSphere {
        return Ok(());
    }
    let value = |key: &str| {
        provider
            .field(key)
            .map(|f| f.value().to_string())
            .unwrap_or_default()
    };
    let login = VsphereLogin {
        endpoint: value("endpoint"),
        user: value("user"),
        password: value("password"),
    };

    match client
        .login(&login)
        .await
        .with_context(|| format!("contacting vSphere at {}", login.endpoint))?
    {
        LoginOutcome::Accepted => {}
        LoginOutcome::Rejected(reason) => {
            return Err(ProviderError::InvalidLogin {
                endpoint: login.endpoint,
                reason,
            }
            .into());
        }
    }

    let datacenters = client
        .datacenters(&login)
        .await
        .context("listing vSphere datacenters")?;
    tracing::debug!(count = datacenters.len(), "vSphere login succeeded");
    provider.mark_authenticated(datacenters);
    Ok(())
}

/// Cloud definition for `provider`, logging in first when it needs a session.
///
/// # Errors
///
/// Returns an error if login fails or the provider has no cloud definition.
pub async fn cloud_config(
    provider: &mut Provider,
    client: &impl DatacenterClient,
) -> Result<CloudConfig> {
    login(provider, client).await?;
    Ok(provider.cloud_config()?)
}
