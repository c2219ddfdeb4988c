//! `summon leader` and `summon run-action`: drive units of a deployed model.

use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::commands::status::ModelArgs;
use crate::domain::error::ActionError;
use crate::output::{json, progress};

/// Arguments for the leader command.
#[derive(Args)]
pub struct LeaderArgs {
    /// Application name
    pub application: String,

    #[command(flatten)]
    pub target: ModelArgs,
}

/// Arguments for the run-action command.
#[derive(Args)]
pub struct RunActionArgs {
    /// Unit to run the action on (e.g. `mysql/0`)
    pub unit: String,

    /// Action name
    pub action: String,

    #[command(flatten)]
    pub target: ModelArgs,
}

/// Print the leader unit of an application.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub async fn leader(app: &AppContext, args: &LeaderArgs) -> Result<ExitCode> {
    let client = app.action_client(&args.target.model);
    let leader = client.leader(&args.application).await;

    if app.is_json() {
        let doc = serde_json::json!({
            "application": args.application,
            "leader": leader,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else if let Some(unit) = &leader {
        println!("{unit}");
    } else {
        app.output
            .warn(&format!("No leader found for {}", args.application));
    }
    Ok(if leader.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Queue an action and wait for its outcome.
///
/// # Errors
///
/// Returns an error when the action fails, has no id, or ends without a
/// recognised outcome.
pub async fn run_action(app: &AppContext, args: &RunActionArgs) -> Result<ExitCode> {
    let client = app.action_client(&args.target.model);
    let pb = app
        .output
        .show_progress()
        .then(|| progress::spinner(&format!("Running {} on {}...", args.action, args.unit)));

    let result = client.run_action(&args.unit, &args.action).await;
    match (&result, &pb) {
        (Ok(outcome), Some(pb)) => progress::finish_ok(pb, &outcome.message),
        (Err(e), Some(pb)) => progress::finish_error(pb, &e.to_string()),
        _ => {}
    }

    match result {
        Ok(outcome) => {
            if app.is_json() {
                let doc = serde_json::json!({
                    "unit": args.unit,
                    "action": args.action,
                    "message": outcome.message,
                    "outcome": outcome.outcome,
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else if pb.is_none() {
                app.output.success(&outcome.message);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if app.is_json() => {
            let code = match &e {
                ActionError::MissingActionId { .. } => "ACTION_NOT_QUEUED",
                ActionError::Failed { .. } => "ACTION_FAILED",
                ActionError::UnknownIssue { .. } => "ACTION_UNKNOWN",
                ActionError::CommandFailed { .. } | ActionError::Backend(_) => "BACKEND_ERROR",
            };
            println!("{}", json::format_error(&e.to_string(), code)?);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}
