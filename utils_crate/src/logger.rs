//! Global `tracing` logger initialisation.
//!
//! Enabled by the `logger_utils_feature` feature.

use std::{fs, io, path::Path, str::FromStr};

use tracing::Level;
use tracing_subscriber::{
    filter::Directive, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::error::UtilsError;

/// Parses a level name from configuration (`"info"`, `"DEBUG"`, ...).
///
/// # Errors
/// Returns `UtilsError::Config` for unknown level names.
pub fn parse_level(name: &str) -> Result<Level, UtilsError> {
    Level::from_str(name.trim())
        .map_err(|_| UtilsError::Config(format!("unknown log level '{name}'")))
}

fn app_directive(app_name: &str, level: Level) -> Result<Directive, UtilsError> {
    // EnvFilter targets use crate names, which carry underscores.
    let target = app_name.replace('-', "_");
    format!("{target}={level}")
        .parse()
        .map_err(|e| UtilsError::Config(format!("invalid log directive for '{app_name}': {e}")))
}

/// Installs the global `tracing` subscriber.
///
/// Logs go to stderr and, when `log_dir` is given, also to a daily rolling
/// file `<log_dir>/<app_name>.log.<date>`. `RUST_LOG` is honoured; the explicit
/// levels are added for the application's own target and the workspace
/// crates that do the work.
///
/// # Arguments
/// * `app_name` - Binary name, used for the filter target and the file name.
/// * `console_level` - Level for the console layer.
/// * `file_level` - Level for the file layer.
/// * `log_dir` - Optional directory for log files.
///
/// # Errors
/// Returns `UtilsError::Generic` if a global subscriber is already installed
/// and `UtilsError::Config` for an unusable `app_name`. A log directory that
/// cannot be created only disables file logging.
pub fn init_tracing_logger(
    app_name: &str,
    console_level: Level,
    file_level: Level,
    log_dir: Option<&Path>,
) -> Result<(), UtilsError> {
    let base_env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let mut console_filter = base_env_filter.clone().add_directive(app_directive(app_name, console_level)?);
    for target in WORKSPACE_TARGETS {
        console_filter = console_filter.add_directive(app_directive(target, console_level)?);
    }

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(true)
        .with_target(false)
        .with_filter(console_filter);

    let mut layers: Vec<Box<dyn Layer<_> + Send + Sync + 'static>> = Vec::new();
    layers.push(console_layer.boxed());

    let mut file_logging = false;
    if let Some(dir) = log_dir {
        if let Err(e) = fs::create_dir_all(dir) {
            // tracing is not up yet.
            eprintln!(
                "[WARN] Could not create log directory {dir:?}: {e}. File logging disabled."
            );
        } else {
            let file_appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
            let mut file_filter = base_env_filter.add_directive(app_directive(app_name, file_level)?);
            for target in WORKSPACE_TARGETS {
                file_filter = file_filter.add_directive(app_directive(target, file_level)?);
            }
            let file_layer = fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(file_filter);
            layers.push(file_layer.boxed());
            file_logging = true;
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| UtilsError::Generic(format!("Failed to initialise logger: {e}")))?;

    match log_dir {
        Some(dir) if file_logging => tracing::info!(
            "Logger initialised. Console level: {}. File logging to {:?} (level {}).",
            console_level,
            dir,
            file_level
        ),
        Some(dir) => tracing::warn!(
            "Logger initialised. Console level: {}. File logging to {:?} unavailable.",
            console_level,
            dir
        ),
        None => tracing::info!("Logger initialised. Console only (level {}).", console_level),
    }
    Ok(())
}

/// Library crates whose events follow the application's levels.
const WORKSPACE_TARGETS: [&str; 4] = [
    "utils_crate",
    "expression_loader",
    "core_burn",
    "training_engine",
];
