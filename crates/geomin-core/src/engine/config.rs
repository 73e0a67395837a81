use super::clash::ClashParams;
use super::fire::FireSettings;
use crate::core::forcefield::model::ModelOptions;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Complete configuration of one minimization run. Every field has a default,
/// so an empty TOML file (or no file at all) yields a working setup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MinimizeConfig {
    /// Run the geometric clash relaxer before minimization; on by default.
    pub clash_relaxation: bool,
    pub model: ModelOptions,
    pub fire: FireSettings,
    pub clash: ClashParams,
}

impl Default for MinimizeConfig {
    fn default() -> Self {
        Self {
            clash_relaxation: true,
            model: ModelOptions::default(),
            fire: FireSettings::default(),
            clash: ClashParams::default(),
        }
    }
}

impl MinimizeConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}
