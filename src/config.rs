// Evaluation configuration
// Threshold grid, stopping policy, output locations and plot styling, loaded from JSON

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analysis::ThresholdGrid;
use crate::observer::{EarlyStopping, Journal};
use crate::render::RenderStyle;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to get data directory")]
    NoDataDir,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Evenly spaced threshold grid bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub min: f64,
    pub max: f64,
    pub points: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            min: -1.0,
            max: 1.0,
            points: 201,
        }
    }
}

/// Settings for one evaluation run. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub grid: GridConfig,

    /// Steps without devel improvement tolerated before stopping
    pub patience: u64,

    pub max_steps: Option<u64>,

    /// Report directory; the platform data directory is used when unset
    pub output_dir: Option<PathBuf>,

    /// JSON-lines file receiving every evaluation record
    pub journal: Option<PathBuf>,

    pub style: RenderStyle,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        EvaluationConfig {
            grid: GridConfig::default(),
            patience: 10,
            max_steps: None,
            output_dir: None,
            journal: None,
            style: RenderStyle::default(),
        }
    }
}

impl EvaluationConfig {
    /// Read and validate a JSON configuration file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let data = fs::read_to_string(path)?;
        let config: EvaluationConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.patience == 0 {
            return Err(ConfigError::Invalid("patience must be at least 1".to_string()));
        }
        self.grid()?;
        Ok(())
    }

    pub fn grid(&self) -> ConfigResult<ThresholdGrid> {
        ThresholdGrid::linspace(self.grid.min, self.grid.max, self.grid.points)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn early_stopping(&self) -> EarlyStopping {
        let stopping = EarlyStopping::new(self.patience);
        match self.max_steps {
            Some(max_steps) => stopping.with_max_steps(max_steps),
            None => stopping,
        }
    }

    /// Configured report directory, or `<data dir>/perfwatch`
    pub fn output_dir(&self) -> ConfigResult<PathBuf> {
        match &self.output_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
                Ok(data_dir.join("perfwatch"))
            }
        }
    }

    pub fn journal(&self) -> Option<Journal> {
        self.journal.clone().map(Journal::new)
    }
}
