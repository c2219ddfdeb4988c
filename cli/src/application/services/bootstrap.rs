//! Application service: controller bootstrap / model creation use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use anyhow::{Context, Result};

use crate::application::ports::{
    Backend, BootstrapRequest, CommandRunner, LocalFs, ModelRequest, ProgressReporter,
    StepScripts,
};
use crate::application::services::provider_tools::configure_tools;
use crate::application::signal::BootstrapSignal;
use crate::domain::bootstrap::{
    self, BootstrapPath, LOG_TAIL_LINES, POST_BOOTSTRAP_STEP, PRE_BOOTSTRAP_STEP,
};
use crate::domain::error::BootstrapError;
use crate::domain::provider::load_schema;
use crate::domain::session::{
    ENV_CONTROLLER, ENV_CREDENTIAL, ENV_MODEL, ENV_PROVIDER_TYPE, ENV_SPELLS_DIR, Session,
};
use crate::domain::step::Step;

/// Injected collaborators for the bootstrap use-case.
pub struct BootstrapDeps<'a, B, S, F, T, P> {
    pub backend: &'a B,
    pub scripts: &'a S,
    pub fs: &'a F,
    /// Runs provider tooling such as the `aws` CLI.
    pub tools: &'a T,
    pub reporter: &'a P,
    pub signal: &'a BootstrapSignal,
}

/// Provision or reuse a controller for `session`, then fire the
/// "bootstrapped" signal.
///
/// # Errors
///
/// Returns [`crate::domain::SchemaError`] for an unknown cloud type,
/// provider tool failures, whatever the backend raises for add-model, and
/// [`BootstrapError::Failed`] (carrying the error log tail) when bootstrap
/// fails. Bootstrap failure is never retried.
pub async fn run<B, S, F, T, P>(
    session: &mut Session,
    deps: &BootstrapDeps<'_, B, S, F, T, P>,
) -> Result<BootstrapPath>
where
    B: Backend,
    S: StepScripts,
    F: LocalFs,
    T: CommandRunner,
    P: ProgressReporter,
{
    let provider = load_schema(&session.cloud_type)?;
    configure_tools(&provider, session, deps.backend, deps.tools).await?;

    let path = if session.is_jaas {
        BootstrapPath::AddModel
    } else {
        let known = deps
            .backend
            .controllers()
            .await
            .context("listing controllers")?;
        bootstrap::decide(session, &known)
    };
    tracing::info!(controller = %session.controller, ?path, "bootstrap decision");

    match path {
        BootstrapPath::AddModel => add_model(session, deps).await?,
        BootstrapPath::Bootstrap => bootstrap_controller(session, deps).await?,
    }
    Ok(path)
}

fn emit(reporter: &impl ProgressReporter, msg: &str) {
    tracing::info!("{msg}");
    reporter.step(msg);
}

async fn add_model<B, S, F, T, P>(
    session: &Session,
    deps: &BootstrapDeps<'_, B, S, F, T, P>,
) -> Result<()>
where
    B: Backend,
    P: ProgressReporter,
{
    emit(deps.reporter, "Creating model.");
    deps.backend
        .add_model(&ModelRequest {
            model: &session.model,
            controller: &session.controller,
            cloud: &session.cloud,
            credential: session.credential.as_deref(),
            defaults: &session.model_defaults,
        })
        .await?;
    emit(deps.reporter, "Model created.");
    deps.signal.set();
    Ok(())
}

async fn bootstrap_controller<B, S, F, T, P>(
    session: &mut Session,
    deps: &BootstrapDeps<'_, B, S, F, T, P>,
) -> Result<()>
where
    B: Backend,
    S: StepScripts,
    F: LocalFs,
    P: ProgressReporter,
{
    pre_bootstrap(session, deps).await?;

    emit(deps.reporter, "Bootstrapping controller.");
    let cloud = session.cloud_with_region();
    let error_log = session.bootstrap_log();
    let ok = deps
        .backend
        .bootstrap(&BootstrapRequest {
            controller: &session.controller,
            cloud: &cloud,
            model: &session.model,
            credential: session.credential.as_deref(),
            defaults: &session.model_defaults,
            error_log: &error_log,
        })
        .await
        .context("running bootstrap")?;

    if !ok {
        let text = match deps.fs.read_to_string(&error_log).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = %error_log.display(), error = %e, "bootstrap error log unreadable");
                String::new()
            }
        };
        let log_tail = bootstrap::log_tail(&text, LOG_TAIL_LINES);
        tracing::error!(lines = log_tail.len(), "error bootstrapping controller");
        return Err(BootstrapError::Failed {
            cloud_type: session.cloud_type.clone(),
            log_tail,
        }
        .into());
    }
    emit(deps.reporter, "Bootstrap complete.");

    let info = deps
        .backend
        .login(&session.controller, &session.model)
        .await
        .context("logging in to the new model")?;
    session.set_env(ENV_PROVIDER_TYPE, info.provider_type);
    session.set_env(ENV_CONTROLLER, session.controller.clone());
    session.set_env(ENV_MODEL, session.model.clone());

    let step = Step::script("post-bootstrap", POST_BOOTSTRAP_STEP);
    run_script_step(&step, session, deps).await?;
    deps.signal.set();
    Ok(())
}

/// Export the session context and run the pre-bootstrap script.
async fn pre_bootstrap<B, S, F, T, P>(
    session: &mut Session,
    deps: &BootstrapDeps<'_, B, S, F, T, P>,
) -> Result<()>
where
    B: Backend,
    S: StepScripts,
    P: ProgressReporter,
{
    let cloud_types = deps
        .backend
        .cloud_types_by_name()
        .await
        .context("listing clouds")?;
    let provider_type = cloud_types
        .get(&session.cloud)
        .cloned()
        .ok_or_else(|| BootstrapError::UnknownCloudType(session.cloud.clone()))?;

    session.set_env(ENV_PROVIDER_TYPE, provider_type);
    session.set_env(ENV_CREDENTIAL, session.credential.clone().unwrap_or_default());
    session.set_env(ENV_CONTROLLER, session.controller.clone());
    session.set_env(ENV_MODEL, session.model.clone());
    session.set_env(ENV_SPELLS_DIR, session.spells_dir.display().to_string());

    let step = Step::script("pre-bootstrap", PRE_BOOTSTRAP_STEP);
    run_script_step(&step, session, deps).await
}

async fn run_script_step<B, S, F, T, P>(
    step: &Step,
    session: &Session,
    deps: &BootstrapDeps<'_, B, S, F, T, P>,
) -> Result<()>
where
    S: StepScripts,
    P: ProgressReporter,
{
    let message = deps
        .scripts
        .run_step(step, &session.env)
        .await
        .with_context(|| format!("running {} step", step.name))?;
    if let Some(msg) = message {
        deps.reporter.success(&msg);
    }
    Ok(())
}
