//! `summon deploy`: provision a controller/model and walk the spell's steps.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio::sync::oneshot;

use crate::app::AppContext;
use crate::application::ports::{ControllerRegistry, StepView};
use crate::application::services::bootstrap::{self, BootstrapDeps};
use crate::application::services::steps;
use crate::application::signal::BootstrapSignal;
use crate::commands::credentials::parse_key_value;
use crate::commands::prompt;
use crate::domain::session::Session;
use crate::domain::step::{Step, StepInput};
use crate::infra::fs::OsFs;
use crate::infra::steps::{ScriptSteps, load_steps};
use crate::output::{OutputContext, TerminalReporter};

/// Arguments for the deploy command.
#[derive(Args)]
pub struct DeployArgs {
    /// Spell directory containing `steps/`
    pub spell_dir: PathBuf,

    /// Cloud name as known to the backend
    #[arg(long)]
    pub cloud: String,

    /// Cloud type tag (looked up from the backend when omitted)
    #[arg(long)]
    pub cloud_type: Option<String>,

    /// Controller to reuse or bootstrap
    #[arg(long)]
    pub controller: String,

    /// Model to create
    #[arg(long)]
    pub model: String,

    /// Cloud region
    #[arg(long)]
    pub region: Option<String>,

    /// Stored credential name
    #[arg(long)]
    pub credential: Option<String>,

    /// Target a shared multi-tenant controller (always adds a model)
    #[arg(long)]
    pub jaas: bool,

    /// Model config passed to the backend (repeatable)
    #[arg(long = "config", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub model_config: Vec<(String, String)>,

    /// Directory holding all spells (defaults to the spell's parent)
    #[arg(long, env = "SUMMON_SPELLS_DIR")]
    pub spells_dir: Option<PathBuf>,
}

/// Step view that collects input on tokio's blocking pool.
///
/// The pipeline awaits the completion channel while `collect` runs; an error
/// drops the sender, which cancels the step.
struct BlockingStepView<F> {
    collect: Arc<F>,
}

impl<F> BlockingStepView<F>
where
    F: Fn(&Step) -> Result<StepInput> + Send + Sync + 'static,
{
    fn new(collect: F) -> Self {
        Self {
            collect: Arc::new(collect),
        }
    }
}

impl<F> StepView for BlockingStepView<F>
where
    F: Fn(&Step) -> Result<StepInput> + Send + Sync + 'static,
{
    fn render(&self, step: &Step, complete: oneshot::Sender<StepInput>) {
        let collect = Arc::clone(&self.collect);
        let step = step.clone();
        tokio::task::spawn_blocking(move || match collect(&step) {
            Ok(input) => {
                let _ = complete.send(input);
            }
            Err(e) => {
                tracing::warn!(step = %step.name, error = %format!("{e:#}"), "step input aborted");
            }
        });
    }
}

/// Terminal prompts for every field of a step.
fn prompt_view(ctx: OutputContext) -> impl StepView {
    BlockingStepView::new(move |step: &Step| {
        crate::output::HumanRenderer::new(&ctx).render_step(step);
        collect_step(&ctx, step).inspect_err(|e| ctx.error(&format!("{e:#}")))
    })
}

fn collect_step(ctx: &OutputContext, step: &Step) -> Result<StepInput> {
    let mut input = StepInput::default();
    for field in &step.fields {
        let mut field = field.clone();
        prompt::prompt_until_valid(&mut field, |err| ctx.error(err))?;
        input.values.insert(field.key.clone(), field.value().to_string());
    }
    if step.needs_sudo {
        input.elevated = Some(prompt::prompt_sudo_password()?);
    }
    Ok(input)
}

/// Step view that completes every step with its default values.
struct AutoStepView;

impl StepView for AutoStepView {
    fn render(&self, step: &Step, complete: oneshot::Sender<StepInput>) {
        tracing::debug!(step = %step.name, "auto-completing step");
        let _ = complete.send(StepInput::defaults(step));
    }
}

/// Run the deploy command.
///
/// # Errors
///
/// Returns an error if bootstrap fails, a step is cancelled, or the spell's
/// step files cannot be read.
pub async fn run(app: &AppContext, args: DeployArgs) -> Result<ExitCode> {
    let backend = app.backend();
    let spell_dir = args.spell_dir.clone();
    let steps_list = load_steps(&spell_dir)?;

    let cloud_type = match args.cloud_type {
        Some(t) => t,
        None => backend
            .cloud_types_by_name()
            .await
            .context("listing clouds")?
            .remove(&args.cloud)
            .with_context(|| format!("Cloud '{}' is not known to the backend", args.cloud))?,
    };

    let spells_dir = args.spells_dir.unwrap_or_else(|| {
        spell_dir
            .parent()
            .map_or_else(|| PathBuf::from("."), PathBuf::from)
    });

    let mut session = Session {
        cloud: args.cloud,
        cloud_type,
        controller: args.controller,
        model: args.model,
        region: args.region,
        credential: args.credential,
        is_jaas: args.jaas,
        spells_dir,
        spell_dir: spell_dir.clone(),
        model_defaults: args.model_config.into_iter().collect(),
        ..Session::default()
    };

    if !app.confirm(
        &format!(
            "Deploy {} to {} on controller {}?",
            session.model,
            session.cloud_with_region(),
            session.controller
        ),
        true,
    )? {
        return Ok(ExitCode::SUCCESS);
    }

    let reporter = TerminalReporter::new(&app.output);
    let scripts = ScriptSteps::new(app.long_runner(), &spell_dir);
    let signal = BootstrapSignal::new();
    let tools = app.runner();
    let deps = BootstrapDeps {
        backend: &backend,
        scripts: &scripts,
        fs: &OsFs,
        tools: &tools,
        reporter: &reporter,
        signal: &signal,
    };
    bootstrap::run(&mut session, &deps).await?;

    let outcome = if app.non_interactive {
        steps::show_steps(&mut session, &steps_list, &AutoStepView, &reporter).await?
    } else {
        let view = prompt_view(app.output.clone());
        steps::show_steps(&mut session, &steps_list, &view, &reporter).await?
    };

    if app.is_json() {
        let doc = serde_json::json!({
            "controller": session.controller,
            "model": session.model,
            "steps": outcome.rendered,
            "step-data": session.step_data,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&doc).context("JSON serialization failed")?
        );
    } else {
        app.output
            .success(&format!("{} is ready", session.model_selector()));
    }
    Ok(ExitCode::SUCCESS)
}
