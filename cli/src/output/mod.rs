//! Terminal output: message glyphs, styling and renderers.
//!
//! Everything a command prints to the user goes through [`OutputContext`].
//! Progress lines normally share stdout with command results; in JSON mode
//! they move to stderr so stdout stays a single parseable document.

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use std::fmt::Display;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use human::HumanRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Stream a message line is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Output context carrying styling and terminal state.
#[derive(Clone)]
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Where progress and status lines go.
    pub progress_stream: Stream,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let mut styles = Styles::default();
        if !no_color && is_tty && std::env::var_os("NO_COLOR").is_none() {
            styles.colorize();
        }
        Self {
            styles,
            is_tty,
            quiet,
            progress_stream: Stream::Stdout,
        }
    }

    /// Send progress lines to `stream` instead of stdout.
    #[must_use]
    pub fn with_progress_stream(mut self, stream: Stream) -> Self {
        self.progress_stream = stream;
        self
    }

    /// Spinners only make sense on an interactive, non-quiet terminal.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet && self.progress_stream == Stream::Stdout
    }

    /// Write a raw line to the progress stream. Suppressed when `quiet`.
    pub fn line(&self, line: impl Display) {
        if self.quiet {
            return;
        }
        match self.progress_stream {
            Stream::Stdout => println!("{line}"),
            Stream::Stderr => eprintln!("{line}"),
        }
    }

    fn glyph_line(&self, glyph: &str, style: Style, msg: &str) {
        self.line(format_args!("  {} {msg}", glyph.style(style)));
    }

    /// `→ msg`, an orchestration step starting.
    pub fn step(&self, msg: &str) {
        self.glyph_line("→", self.styles.step, msg);
    }

    /// `✓ msg`
    pub fn success(&self, msg: &str) {
        self.glyph_line("✓", self.styles.success, msg);
    }

    /// `⚠ msg`
    pub fn warn(&self, msg: &str) {
        self.glyph_line("⚠", self.styles.warning, msg);
    }

    /// `ℹ msg`
    pub fn info(&self, msg: &str) {
        self.glyph_line("ℹ", self.styles.info, msg);
    }

    /// `✗ msg` on stderr. Never suppressed, even when `quiet`.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Section header.
    pub fn header(&self, msg: &str) {
        self.line(format_args!("  {}", msg.style(self.styles.header)));
    }

    /// Key-value pair with the key dimmed.
    pub fn kv(&self, key: &str, value: &str) {
        self.line(format_args!("  {}  {value}", key.style(self.styles.dim)));
    }
}
