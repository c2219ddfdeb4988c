//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Provision a controller and model, then walk a spell's steps
#[derive(Parser)]
#[command(
    name = "summon",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Skip prompts and accept defaults
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List supported cloud providers
    Providers,

    /// Fill in and validate a provider credential
    Credentials(commands::credentials::CredentialsArgs),

    /// Bootstrap or reuse a controller, add the model and run the spell's steps
    Deploy(commands::deploy::DeployArgs),

    /// Show unit and machine status
    Status(commands::status::ModelArgs),

    /// Show the leader unit of an application
    Leader(commands::action::LeaderArgs),

    /// Run an action on a unit and wait for it to finish
    RunAction(commands::action::RunActionArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
        })?;

        match command {
            Command::Providers => commands::providers::run(&app),
            Command::Credentials(args) => commands::credentials::run(&app, args).await,
            Command::Deploy(args) => commands::deploy::run(&app, args).await,
            Command::Status(args) => commands::status::run(&app, &args).await,
            Command::Leader(args) => commands::action::leader(&app, &args).await,
            Command::RunAction(args) => commands::action::run_action(&app, &args).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
        }
    }
}
