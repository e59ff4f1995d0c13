//! Experiment configuration.
//!
//! Sources, highest precedence first:
//! 1. Environment variables (`PAINTSHOP_` prefix)
//! 2. A YAML file (explicit path, else `<config dir>/paintshop/config.yaml` if present)
//! 3. Default values

use std::f64::consts::PI;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use paintshop_core::{GridSearch, ParameterBounds};
use serde::{Deserialize, Serialize};

use crate::error::{CollectError, CollectResult};

/// Settings for preparing and recording QAOA tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectConfig {
    /// Root of the task store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Experiment name used for task directories.
    #[serde(default = "default_experiment")]
    pub experiment: String,

    /// Shots requested per circuit.
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Scale applied to every coupling constant.
    #[serde(default = "default_coupling_strength")]
    pub coupling_strength: f64,

    /// Parameter grid.
    #[serde(default)]
    pub grid: GridConfig,
}

/// Resolution and bounds of the `(γ, β)` grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    /// Number of γ values.
    #[serde(default = "default_gamma_steps")]
    pub gamma_steps: usize,

    /// Number of β values.
    #[serde(default = "default_beta_steps")]
    pub beta_steps: usize,

    /// Smallest γ.
    #[serde(default)]
    pub gamma_min: f64,

    /// Largest γ (inclusive).
    #[serde(default = "default_gamma_max")]
    pub gamma_max: f64,

    /// Smallest β.
    #[serde(default)]
    pub beta_min: f64,

    /// Largest β (inclusive).
    #[serde(default = "default_beta_max")]
    pub beta_max: f64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("paintshop-data")
}

fn default_experiment() -> String {
    "qaoa".to_string()
}

fn default_shots() -> u32 {
    1024
}

fn default_coupling_strength() -> f64 {
    1.0
}

fn default_gamma_steps() -> usize {
    12
}

fn default_beta_steps() -> usize {
    8
}

fn default_gamma_max() -> f64 {
    PI
}

fn default_beta_max() -> f64 {
    PI / 2.0
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            experiment: default_experiment(),
            shots: default_shots(),
            coupling_strength: default_coupling_strength(),
            grid: GridConfig::default(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            gamma_steps: default_gamma_steps(),
            beta_steps: default_beta_steps(),
            gamma_min: 0.0,
            gamma_max: default_gamma_max(),
            beta_min: 0.0,
            beta_max: default_beta_max(),
        }
    }
}

impl GridConfig {
    /// The grid as an optimizer.
    pub fn grid_search(&self) -> GridSearch {
        GridSearch::new(self.gamma_steps, self.beta_steps).with_bounds(ParameterBounds {
            gamma_min: self.gamma_min,
            gamma_max: self.gamma_max,
            beta_min: self.beta_min,
            beta_max: self.beta_max,
        })
    }
}

impl CollectConfig {
    /// Per-user configuration file, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("paintshop").join("config.yaml"))
    }

    /// Parse YAML text.
    pub fn from_yaml(text: &str) -> CollectResult<Self> {
        let config: Self = serde_yaml_ng::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> CollectResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&contents)
    }

    /// Load with file, environment and defaults applied in precedence order.
    pub fn load(config_file: Option<&Path>) -> CollectResult<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => {
                    tracing::debug!(path = %path.display(), "using user configuration");
                    Self::from_file(path)?
                }
                None => Self::default(),
            },
        };

        let config = config.merge_env_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `PAINTSHOP_*` variables provided by `lookup`.
    ///
    /// Unset variables leave fields unchanged; unparsable values are errors.
    pub fn merge_env_with<F>(mut self, lookup: F) -> CollectResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PAINTSHOP_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("PAINTSHOP_EXPERIMENT") {
            self.experiment = v;
        }
        if let Some(v) = lookup("PAINTSHOP_SHOTS") {
            self.shots = parse_env("PAINTSHOP_SHOTS", &v)?;
        }
        if let Some(v) = lookup("PAINTSHOP_COUPLING_STRENGTH") {
            self.coupling_strength = parse_env("PAINTSHOP_COUPLING_STRENGTH", &v)?;
        }
        if let Some(v) = lookup("PAINTSHOP_GAMMA_STEPS") {
            self.grid.gamma_steps = parse_env("PAINTSHOP_GAMMA_STEPS", &v)?;
        }
        if let Some(v) = lookup("PAINTSHOP_BETA_STEPS") {
            self.grid.beta_steps = parse_env("PAINTSHOP_BETA_STEPS", &v)?;
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> CollectResult<()> {
        if self.experiment.is_empty() {
            return Err(CollectError::Config("experiment must not be empty".into()));
        }
        if self.shots == 0 {
            return Err(CollectError::Config(
                "shots must be greater than 0".to_string(),
            ));
        }
        if !self.coupling_strength.is_finite() || self.coupling_strength == 0.0 {
            return Err(CollectError::Config(format!(
                "coupling_strength must be finite and non-zero, got {}",
                self.coupling_strength
            )));
        }

        let grid = &self.grid;
        if grid.gamma_steps == 0 || grid.beta_steps == 0 {
            return Err(CollectError::Config(
                "grid needs at least one step per axis".to_string(),
            ));
        }
        let bounds = [grid.gamma_min, grid.gamma_max, grid.beta_min, grid.beta_max];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(CollectError::Config("grid bounds must be finite".into()));
        }
        if grid.gamma_min > grid.gamma_max || grid.beta_min > grid.beta_max {
            return Err(CollectError::Config(format!(
                "empty grid: gamma [{}, {}], beta [{}, {}]",
                grid.gamma_min, grid.gamma_max, grid.beta_min, grid.beta_max
            )));
        }

        Ok(())
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> CollectResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| CollectError::Config(format!("{key}='{value}': {e}")))
}
