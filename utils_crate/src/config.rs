use serde::Deserialize;
use std::path::Path;
use tracing::warn;

use crate::error::UtilsError;

/// Application configuration shared by the experiment binaries.
///
/// Experiment parameters come from the command line; this file carries the
/// settings that rarely change between runs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfigSub,

    /// Training runtime settings.
    #[serde(default)]
    pub training: TrainingConfigSub,
}

/// Logging settings (`[logging]`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfigSub {
    /// Console level.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// File level, used when `log_dir` is set.
    #[serde(default = "default_file_log_level")]
    pub file_level: String,
    /// Directory for rolling log files.
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_file_log_level() -> String {
    "debug".to_string()
}

impl Default for LoggingConfigSub {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_level: default_file_log_level(),
            log_dir: None,
        }
    }
}

/// Training runtime settings (`[training]`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrainingConfigSub {
    /// Mini-batch size.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Compute device: `"cpu"` or `"cuda"` (only with the LibTorch backend).
    #[serde(default = "default_device")]
    pub device: String,
    /// Interpolation steps for integrated gradients.
    #[serde(default = "default_ig_steps")]
    pub integrated_gradient_steps: usize,
}

fn default_batch_size() -> usize {
    128
}
fn default_device() -> String {
    "cpu".to_string()
}
fn default_ig_steps() -> usize {
    50
}

impl Default for TrainingConfigSub {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            device: default_device(),
            integrated_gradient_steps: default_ig_steps(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration from a TOML file.
    /// A missing file yields the default configuration.
    ///
    /// # Arguments
    /// * `file_path` - Path to the TOML file.
    ///
    /// # Errors
    /// Returns `UtilsError::Io` if the file cannot be read and
    /// `UtilsError::Config` if it is not valid TOML for this structure or
    /// holds unusable values.
    pub fn load_from_toml(file_path: &Path) -> Result<Self, UtilsError> {
        if !file_path.exists() {
            warn!(
                "AppConfig file not found at {:?}, using default configuration.",
                file_path
            );
            return Ok(Self::default());
        }
        let config_str = std::fs::read_to_string(file_path)
            .map_err(|e| UtilsError::io_with_path(e, file_path.to_string_lossy().into_owned()))?;
        let config: Self = toml::from_str(&config_str)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), UtilsError> {
        if self.training.batch_size == 0 {
            return Err(UtilsError::Config("training.batch_size must be positive".into()));
        }
        if self.training.integrated_gradient_steps < 2 {
            return Err(UtilsError::Config(
                "training.integrated_gradient_steps must be at least 2".into(),
            ));
        }
        Ok(())
    }
}
