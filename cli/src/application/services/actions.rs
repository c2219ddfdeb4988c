//! Application service: remote status queries and fire-and-poll actions.
//!
//! Every operation shells out to the backend binary through the injected
//! [`CommandRunner`] and parses the YAML response with the domain parsers.

use std::time::Duration;

use anyhow::Context;

use crate::application::ports::CommandRunner;
use crate::domain::error::ActionError;
use crate::domain::status::{
    ActionReport, ActionStatus, EntityState, LeaderProbe, StatusSnapshot, find_leader,
    parse_queued_action_id,
};

/// Default delay between `show-action-output` polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Terminal success of a remote action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Human-readable completion message.
    pub message: String,
    /// The action's `outcome` result, when it reported one.
    pub outcome: Option<String>,
}

/// Status/action client bound to one `controller:model`.
pub struct ActionClient<R> {
    runner: R,
    binary: String,
    selector: String,
    poll_interval: Duration,
}

impl<R: CommandRunner> ActionClient<R> {
    pub fn new(runner: R, binary: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
            selector: selector.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Run the backend and return stdout, or `None` on any failure.
    async fn query(&self, args: &[&str]) -> Option<String> {
        match self.runner.run(&self.binary, args).await {
            Ok(out) if out.status.success() => Some(String::from_utf8_lossy(&out.stdout).into_owned()),
            Ok(out) => {
                tracing::debug!(
                    ?args,
                    stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                    "backend query failed"
                );
                None
            }
            Err(e) => {
                tracing::debug!(?args, error = %e, "backend query could not run");
                None
            }
        }
    }

    /// Current model status. `None` when the query fails or cannot be parsed.
    pub async fn status(&self) -> Option<StatusSnapshot> {
        let doc = self
            .query(&["status", "-m", &self.selector, "--format", "yaml"])
            .await?;
        match serde_yaml::from_str(&doc) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::debug!(error = %e, "unparseable status document");
                None
            }
        }
    }

    /// Workload state of every unit.
    ///
    /// # Errors
    ///
    /// Returns an error when the status is unavailable.
    pub async fn agent_states(&self) -> anyhow::Result<Vec<EntityState>> {
        let snapshot = self.status().await.context("unable to read model status")?;
        Ok(snapshot.agent_states())
    }

    /// Agent state of every machine.
    ///
    /// # Errors
    ///
    /// Returns an error when the status is unavailable.
    pub async fn machine_states(&self) -> anyhow::Result<Vec<EntityState>> {
        let snapshot = self.status().await.context("unable to read model status")?;
        Ok(snapshot.machine_states())
    }

    /// Unit currently holding leadership of `application`, if any.
    pub async fn leader(&self, application: &str) -> Option<String> {
        let doc = self
            .query(&[
                "run",
                "-m",
                &self.selector,
                "--application",
                application,
                "is-leader",
                "--format",
                "yaml",
            ])
            .await?;
        let probes: Vec<LeaderProbe> = serde_yaml::from_str(&doc).ok()?;
        find_leader(&probes)
    }

    /// Run a backend command that must succeed, returning its stdout.
    async fn invoke(&self, args: &[&str], what: &str) -> Result<String, ActionError> {
        let out = self
            .runner
            .run(&self.binary, args)
            .await
            .with_context(|| what.to_string())?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            tracing::error!(?args, %stderr, "backend command failed");
            return Err(ActionError::CommandFailed {
                command: format!("{} {}", self.binary, args[0]),
                stderr,
            });
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }

    /// Queue `action` on `unit` and poll until it reaches a terminal state.
    ///
    /// # Errors
    ///
    /// - [`ActionError::CommandFailed`] when either backend command exits
    ///   non-zero.
    /// - [`ActionError::MissingActionId`] when the queue response has no id.
    /// - [`ActionError::Failed`] when the action reports `failed`. No further
    ///   polls are issued.
    /// - [`ActionError::UnknownIssue`] when a poll response is unreadable or
    ///   has no status, or the action completes with results that carry no
    ///   outcome.
    /// - [`ActionError::Backend`] when a command cannot be run.
    pub async fn run_action(&self, unit: &str, action: &str) -> Result<ActionOutcome, ActionError> {
        let unknown_issue = || ActionError::UnknownIssue {
            unit: unit.to_string(),
            action: action.to_string(),
        };

        let queued = self
            .invoke(
                &["run-action", "-m", &self.selector, unit, action],
                &format!("queueing {action} on {unit}"),
            )
            .await?;
        let id = parse_queued_action_id(&queued).ok_or_else(|| ActionError::MissingActionId {
            unit: unit.to_string(),
            action: action.to_string(),
        })?;
        tracing::info!(%unit, %action, %id, "action queued");

        loop {
            let doc = self
                .invoke(
                    &["show-action-output", "-m", &self.selector, &id],
                    &format!("polling action {id}"),
                )
                .await?;
            let report = ActionReport::parse(&doc).map_err(|e| {
                tracing::error!(%id, error = %e, "unparseable action output");
                unknown_issue()
            })?;
            tracing::debug!(%id, status = ?report.status, "action poll");

            match report.status {
                ActionStatus::Failed => {
                    tracing::error!(%unit, %action, %id, "action failed");
                    return Err(ActionError::Failed {
                        unit: unit.to_string(),
                        action: action.to_string(),
                    });
                }
                ActionStatus::Completed => {
                    let message = format!("{unit} {action} completed");
                    if report.results.is_none() {
                        return Ok(ActionOutcome {
                            message,
                            outcome: None,
                        });
                    }
                    if let Some(outcome) = report.outcome() {
                        return Ok(ActionOutcome {
                            message: format!("{message}: (result) {outcome}"),
                            outcome: Some(outcome),
                        });
                    }
                    break;
                }
                ActionStatus::Unreported => {
                    tracing::error!(%id, "action output carries no status");
                    return Err(unknown_issue());
                }
                ActionStatus::Pending | ActionStatus::Running | ActionStatus::Other(_) => {
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }

        tracing::error!(%unit, %action, %id, "action finished without a recognised outcome");
        Err(unknown_issue())
    }
}
