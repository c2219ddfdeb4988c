//! `summon credentials`: fill in and validate a provider's credential fields.

use anyhow::{Context, Result};
use clap::Args;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::application::services::provider_tools;
use crate::commands::prompt;
use crate::domain::provider::{Provider, ProviderKind, load_schema};
use crate::infra::govc::GovcClient;
use crate::infra::network;

/// Arguments for the credentials command.
#[derive(Args)]
pub struct CredentialsArgs {
    /// Cloud type tag (e.g. ec2, maas, vsphere, localhost)
    pub cloud_type: String,

    /// Preset a field value (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,

    /// Also print the cloud definition (maas, vsphere)
    #[arg(long)]
    pub cloud_config: bool,
}

/// Parse a `KEY=VALUE` pair.
///
/// # Errors
///
/// Returns an error when there is no `=` or the key is empty.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

/// Run the credentials command.
///
/// # Errors
///
/// Returns an error if the cloud type is unknown, a preset key does not exist,
/// or the resulting credential is invalid.
pub async fn run(app: &AppContext, args: CredentialsArgs) -> Result<ExitCode> {
    let mut provider = load_schema(&args.cloud_type)?;

    if provider.kind() == ProviderKind::Localhost {
        match network::physical_interfaces() {
            Ok(ifaces) => provider.offer_choices("network-interface", ifaces),
            Err(e) => tracing::warn!(error = %e, "cannot list network interfaces"),
        }
    }

    for (key, value) in &args.set {
        if !provider.set_value(key, value) {
            let valid: Vec<&str> = provider.fields().iter().map(|f| f.key.as_str()).collect();
            anyhow::bail!(
                "Unknown field '{key}' for {}. Valid fields: {}",
                args.cloud_type,
                valid.join(", ")
            );
        }
    }

    if !app.non_interactive {
        collect_interactively(app, &mut provider, &args)?;
    }

    if !provider.is_valid() {
        app.renderer().render_fields(&provider);
        anyhow::bail!("Credential for {} is not valid", args.cloud_type);
    }

    let credential = provider.credential();
    let cloud = if args.cloud_config {
        let client = GovcClient::new(app.runner());
        Some(provider_tools::cloud_config(&mut provider, &client).await?)
    } else {
        None
    };

    if app.is_json() {
        let doc = serde_json::json!({
            "cloud-type": args.cloud_type,
            "credential": credential,
            "cloud": cloud,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&doc).context("JSON serialization failed")?
        );
    } else {
        print!(
            "{}",
            serde_yaml::to_string(&credential).context("cannot serialize credential")?
        );
        if let Some(cloud) = cloud {
            println!("---");
            print!(
                "{}",
                serde_yaml::to_string(&cloud).context("cannot serialize cloud")?
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Prompt for every field not preset with `--set`.
fn collect_interactively(
    app: &AppContext,
    provider: &mut Provider,
    args: &CredentialsArgs,
) -> Result<()> {
    app.output.header(&format!("{} credential", provider.kind().name()));
    for field in provider.fields_mut() {
        if args.set.iter().any(|(k, _)| *k == field.key) {
            continue;
        }
        prompt::prompt_until_valid(field, |err| app.output.error(err))?;
    }
    Ok(())
}
