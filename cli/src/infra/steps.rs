//! Spell step files: YAML metadata loading and script execution.
//!
//! A spell keeps its steps under `<spell-dir>/steps/`: `NN_name.yaml` holds
//! the metadata and `NN_name` (no extension) is the optional script.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, EnvOverlay, StepScripts};
use crate::domain::step::{Step, StepSpec};

/// Directory holding a spell's step files.
#[must_use]
pub fn steps_dir(spell_dir: &Path) -> PathBuf {
    spell_dir.join("steps")
}

/// Load every `steps/*.yaml` of a spell, ordered by filename.
///
/// A spell without a `steps` directory has no steps.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed or a step file is not
/// valid YAML.
pub fn load_steps(spell_dir: &Path) -> Result<Vec<Step>> {
    let dir = steps_dir(spell_dir);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "yaml"))
        .collect();
    paths.sort();

    paths
        .iter()
        .map(|path| {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let spec: StepSpec = serde_yaml::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            let filename = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(Step::from_spec(&filename, spec))
        })
        .collect()
}

/// Runs step scripts from a spell directory.
pub struct ScriptSteps<R> {
    runner: R,
    spell_dir: PathBuf,
}

impl<R: CommandRunner> ScriptSteps<R> {
    pub fn new(runner: R, spell_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            spell_dir: spell_dir.into(),
        }
    }
}

impl<R: CommandRunner> StepScripts for ScriptSteps<R> {
    async fn run_step(&self, step: &Step, env: &EnvOverlay) -> Result<Option<String>> {
        let script = steps_dir(&self.spell_dir).join(&step.filename);
        if !script.is_file() {
            tracing::debug!(step = %step.name, path = %script.display(), "no step script");
            return Ok(None);
        }
        let program = script.to_string_lossy();
        tracing::info!(step = %step.name, "running step script");
        let output = self.runner.run_with_env(&program, &[], env).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("step {} failed: {}", step.name, stderr.trim());
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .map(str::trim)
            .rfind(|l| !l.is_empty())
            .map(str::to_string))
    }
}
