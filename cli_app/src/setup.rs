//! Application config and logger start-up.

use std::path::Path;

use anyhow::{bail, Context, Result};
use training_engine::DeviceKind;
use utils_crate::{init_tracing_logger, parse_level, AppConfig};

/// Loads `AppConfig` from `path`, or the defaults when no path is given.
///
/// Runs before the logger exists, so a named file that is missing is an
/// error rather than a fallback to the defaults.
///
/// # Errors
/// If the file does not exist or cannot be read or parsed.
pub fn load_app_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(p) if !p.exists() => bail!("Configuration file {} does not exist", p.display()),
        Some(p) => AppConfig::load_from_toml(p)
            .with_context(|| format!("Failed to load configuration from {}", p.display())),
        None => Ok(AppConfig::default()),
    }
}

/// Installs the global subscriber with the levels of `config.logging`.
///
/// # Errors
/// For an unknown level name or if a subscriber is already installed.
pub fn init_logging(app_name: &str, config: &AppConfig) -> Result<()> {
    let console = parse_level(&config.logging.level).context("Invalid logging.level")?;
    let file = parse_level(&config.logging.file_level).context("Invalid logging.file_level")?;
    init_tracing_logger(app_name, console, file, config.logging.log_dir.as_deref().map(Path::new))
        .context("Failed to initialise logging")
}

/// Device named by `training.device`.
///
/// # Errors
/// For a name other than `cpu`, `cuda` or `gpu`.
pub fn device(config: &AppConfig) -> Result<DeviceKind> {
    config
        .training
        .device
        .parse()
        .context("Invalid training.device")
}
