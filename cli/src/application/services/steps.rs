//! Application service: ordered step pipeline.
//!
//! Presents each viewable step, waits for its completion signal, and records
//! the collected values into the session. Imports only from `crate::domain`
//! and `crate::application::ports`.

use tokio::sync::oneshot;

use crate::application::ports::{ProgressReporter, StepView};
use crate::domain::error::PipelineError;
use crate::domain::session::Session;
use crate::domain::step::{Step, StepInput};

/// Summary of a finished pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Names of the steps that were presented, in order.
    pub rendered: Vec<String>,
}

/// Run the step pipeline.
///
/// Steps are presented strictly in the given order and only when
/// `viewable`. Each step is rendered once and must signal completion before
/// the next one is shown. An empty list finishes immediately.
///
/// # Errors
///
/// Returns [`PipelineError::Cancelled`] when a view drops its completion
/// sender without sending. Session data from earlier steps is kept.
pub async fn show_steps(
    session: &mut Session,
    steps: &[Step],
    view: &impl StepView,
    reporter: &impl ProgressReporter,
) -> Result<PipelineOutcome, PipelineError> {
    let mut outcome = PipelineOutcome::default();

    for step in steps.iter().filter(|s| s.viewable) {
        tracing::debug!(step = %step.name, "presenting step");
        let (tx, rx) = oneshot::channel();
        view.render(step, tx);
        let input = rx
            .await
            .map_err(|_| PipelineError::Cancelled(step.name.clone()))?;
        record(session, step, input);
        outcome.rendered.push(step.name.clone());
    }

    if outcome.rendered.is_empty() {
        tracing::debug!("no viewable steps");
    } else {
        reporter.success("All steps complete.");
    }
    Ok(outcome)
}

fn record(session: &mut Session, step: &Step, mut input: StepInput) {
    if let Some(password) = input.elevated.take() {
        session.elevated_credential = Some(password);
    }
    let entry = session.step_data.entry(step.name.clone()).or_default();
    for field in &step.fields {
        let value = input
            .values
            .remove(&field.key)
            .unwrap_or_else(|| field.value().to_string());
        entry.insert(field.key.clone(), value);
    }
}
