//! Spinners for long backend calls (action polling).

#![allow(clippy::expect_used)] // Templates are compile-time constants

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK: Duration = Duration::from_millis(100);

/// Indeterminate spinner showing `msg`.
///
/// # Panics
///
/// Never in practice: the template is a constant.
#[must_use]
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner().with_message(msg.to_string());
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["◐", "◓", "◑", "◒", "●"])
            .template("  {spinner:.cyan} {msg} {elapsed:.dim}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(TICK);
    pb
}

fn finish(pb: &ProgressBar, glyph: &'static str, msg: &str) {
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {prefix} {msg}")
            .expect("valid template"),
    );
    pb.set_prefix(glyph);
    pb.finish_with_message(msg.to_string());
}

/// Replace the spinner with `✓ msg`.
pub fn finish_ok(pb: &ProgressBar, msg: &str) {
    finish(pb, "✓", msg);
}

/// Replace the spinner with `✗ msg`.
pub fn finish_error(pb: &ProgressBar, msg: &str) {
    finish(pb, "✗", msg);
}
