//! CLI subcommand implementations for the `studymatch` binary.

pub mod config_cmd;
pub mod eval_cmd;
pub mod fit_cmd;
pub mod group_cmd;
pub mod join_cmd;
pub mod match_cmd;
pub mod output;
pub mod profile_args;
pub mod serve_cmd;

use crate::config::StudyMatchConfig;
use crate::matching::Matcher;
use crate::model::ModelArtifacts;
use crate::registry::SqliteRegistry;
use anyhow::{Context, Result};

/// Load the frozen artifacts. Failure here is fatal for every serving command.
pub fn load_matcher(config: &StudyMatchConfig) -> Result<Matcher> {
    let artifacts = ModelArtifacts::load(&config.model_path, &config.scaler_path)
        .context("model artifacts unavailable (run `studymatch fit` first)")?;
    Ok(Matcher::from_artifacts(artifacts, config.scoring.policy()))
}

pub fn open_registry(config: &StudyMatchConfig) -> Result<SqliteRegistry> {
    SqliteRegistry::open(&config.registry_path)
        .with_context(|| format!("opening registry {}", config.registry_path.display()))
}
