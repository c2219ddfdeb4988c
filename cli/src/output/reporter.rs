//! `TerminalReporter`: the orchestrator's message-emission sink.
//!
//! Application services only see the `ProgressReporter` port; this adapter
//! forwards each event to the `OutputContext` and mirrors it into the log so
//! a `RUST_LOG=info` run carries the same transitions the user saw.

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

/// Progress reporter writing through an `OutputContext`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        self.ctx.step(message);
    }

    fn success(&self, message: &str) {
        tracing::debug!(message, "progress: success");
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(message, "progress: warning");
        self.ctx.warn(message);
    }
}
