//! Bootstrap decision logic: pure functions, no I/O.

use crate::domain::session::Session;

/// Number of trailing error-log lines attached to a bootstrap failure.
pub const LOG_TAIL_LINES: usize = 400;

/// Source identifier of the pre-bootstrap pseudo-step.
pub const PRE_BOOTSTRAP_STEP: &str = "00_pre-bootstrap";
/// Source identifier of the post-bootstrap pseudo-step.
pub const POST_BOOTSTRAP_STEP: &str = "00_post-bootstrap";

/// Which branch the orchestrator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapPath {
    /// Reuse the existing controller and add a model to it.
    AddModel,
    /// Create a new controller.
    Bootstrap,
}

/// Decide whether to reuse infrastructure or create it.
///
/// A shared controller is always reused; otherwise reuse only if the
/// targeted controller is already known.
#[must_use]
pub fn decide(session: &Session, known_controllers: &[String]) -> BootstrapPath {
    if session.is_jaas || known_controllers.iter().any(|c| *c == session.controller) {
        BootstrapPath::AddModel
    } else {
        BootstrapPath::Bootstrap
    }
}

/// Last `n` lines of `text`.
#[must_use]
pub fn log_tail(text: &str, n: usize) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].iter().map(|l| (*l).to_string()).collect()
}
