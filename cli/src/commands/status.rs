//! `summon status`: unit and machine states of a model.

use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::output::json;

/// Model selector shared by status and action commands.
#[derive(Args)]
pub struct ModelArgs {
    /// Target model as `controller:model`
    #[arg(short, long, env = "SUMMON_MODEL")]
    pub model: String,
}

/// Run the status command.
///
/// # Errors
///
/// Returns an error if the model status cannot be read.
pub async fn run(app: &AppContext, args: &ModelArgs) -> Result<ExitCode> {
    let client = app.action_client(&args.model);
    let Some(snapshot) = client.status().await else {
        if app.is_json() {
            println!(
                "{}",
                json::format_error(
                    &format!("unable to read status of {}", args.model),
                    "STATUS_UNAVAILABLE"
                )?
            );
        } else {
            app.output
                .error(&format!("Unable to read status of {}", args.model));
        }
        return Ok(ExitCode::FAILURE);
    };

    let units = snapshot.agent_states();
    let machines = snapshot.machine_states();
    if app.is_json() {
        println!("{}", json::format_status(&units, &machines)?);
    } else {
        app.renderer().render_status(&units, &machines);
    }
    Ok(ExitCode::SUCCESS)
}
