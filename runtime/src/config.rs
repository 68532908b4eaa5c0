//! Runtime configuration, read from `$STUDYMATCH_HOME/config.toml`.

use crate::matching::RankingPolicy;
use crate::training::FitOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file inside the home directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Root of all StudyMatch state (`~/.studymatch` unless `STUDYMATCH_HOME` is set).
pub fn studymatch_home() -> PathBuf {
    if let Ok(p) = std::env::var("STUDYMATCH_HOME") {
        return PathBuf::from(p);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".studymatch")
}

/// Scoring behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Sort on 2-decimal rounded scores instead of full precision.
    pub rank_on_rounded: bool,
}

impl ScoringConfig {
    pub fn policy(&self) -> RankingPolicy {
        if self.rank_on_rounded {
            RankingPolicy::Rounded
        } else {
            RankingPolicy::Unrounded
        }
    }
}

/// HTTP API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Top-level configuration. Relative paths resolve against the home directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyMatchConfig {
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    pub registry_path: PathBuf,
    pub fit: FitOptions,
    pub scoring: ScoringConfig,
    pub server: ServerConfig,
}

impl Default for StudyMatchConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model/model.json"),
            scaler_path: PathBuf::from("model/scaler.json"),
            registry_path: PathBuf::from("data/registry.db"),
            fit: FitOptions::default(),
            scoring: ScoringConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl StudyMatchConfig {
    /// Load `config.toml` from `home`, falling back to defaults when absent.
    pub fn load_from(home: &Path) -> Result<Self> {
        let path = home.join(CONFIG_FILE);
        let mut config: Self = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        } else {
            Self::default()
        };
        config.resolve_paths(home);
        Ok(config)
    }

    /// Load from the default home directory.
    pub fn load() -> Result<Self> {
        Self::load_from(&studymatch_home())
    }

    fn resolve_paths(&mut self, home: &Path) {
        for path in [&mut self.model_path, &mut self.scaler_path, &mut self.registry_path] {
            if path.is_relative() {
                *path = home.join(&*path);
            }
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serializing config")
    }
}
