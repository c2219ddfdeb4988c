//! Application context: what every command handler shares.
//!
//! `AppContext` owns terminal output, the loaded configuration and the
//! interactivity decision. It is also the one place infrastructure adapters
//! are wired to that configuration (timeouts, backend binary, poll interval).

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::application::services::actions::ActionClient;
use crate::domain::config::SummonConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::juju::JujuCli;
use crate::output::{HumanRenderer, OutputContext, Stream};

/// Environment variables that switch off prompting.
const NON_INTERACTIVE_ENV: &[&str] = &["CI", "SUMMON_YES"];

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    pub no_color: bool,
    pub quiet: bool,
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip prompts, accepting defaults.
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    pub output: OutputContext,
    pub mode: OutputMode,
    /// Where `config set` writes.
    pub config_store: YamlConfigStore,
    /// Configuration loaded at startup.
    pub config: SummonConfig,
    /// Skip prompts: `--yes`, or `CI` / `SUMMON_YES` in the environment.
    /// Deploy steps then complete with their default values.
    pub non_interactive: bool,
}

impl AppContext {
    /// Build the context from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be parsed.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let non_interactive = flags.behaviour.yes
            || NON_INTERACTIVE_ENV
                .iter()
                .any(|var| std::env::var_os(var).is_some());

        let (mode, progress) = if flags.output.json {
            (OutputMode::Json, Stream::Stderr)
        } else {
            (OutputMode::Human, Stream::Stdout)
        };

        let config_store = YamlConfigStore::default();
        let config = config_store.load()?;
        tracing::debug!(?config, non_interactive, "loaded configuration");

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet)
                .with_progress_stream(progress),
            mode,
            config_store,
            config,
            non_interactive,
        })
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    #[must_use]
    pub fn renderer(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }

    /// Runner for backend queries and provider tools.
    #[must_use]
    pub fn runner(&self) -> TokioCommandRunner {
        TokioCommandRunner::new(self.config.backend.command_timeout())
    }

    /// Runner for long work such as step scripts.
    #[must_use]
    pub fn long_runner(&self) -> TokioCommandRunner {
        TokioCommandRunner::new(self.config.backend.bootstrap_timeout())
    }

    #[must_use]
    pub fn backend(&self) -> JujuCli<TokioCommandRunner> {
        JujuCli::new(self.runner(), &self.config.backend.binary)
            .with_bootstrap_timeout(self.config.backend.bootstrap_timeout())
    }

    /// Status/action client bound to `selector` (`controller:model`).
    #[must_use]
    pub fn action_client(&self, selector: &str) -> ActionClient<TokioCommandRunner> {
        ActionClient::new(self.runner(), &self.config.backend.binary, selector)
            .with_poll_interval(self.config.actions.poll_interval())
    }

    /// Yes/no prompt, answering `default` without asking when non-interactive.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        Ok(dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }
}
