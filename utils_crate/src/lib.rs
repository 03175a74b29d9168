#![warn(
    missing_docs, // Public items must be documented.
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![deny(
    unsafe_code,
    unused_mut,
    unused_imports,
    unused_attributes
)]

//! `utils_crate` holds the pieces shared by every crate of the voxel MLP
//! workspace: the common error type, logger initialisation, the TOML
//! application config and small path and naming helpers.
//!
//! # Modules
//!
//! - [`error`]: the workspace-wide `UtilsError`.
//! - [`naming`]: output-name formatting (label-set capitalisation, float
//!   notation used in result file names and parameter columns).
//! - [`config`]: (feature `config_toml`) `AppConfig` loaded from TOML.
//! - [`path`]: (feature `path_utils_feature`) directory and data-file helpers.
//! - [`logger`]: (feature `logger_utils_feature`) global `tracing` subscriber.
//!
//! ```toml
//! # utils_crate = { path = "../utils_crate", features = ["logger_utils_feature"] }
//! ```

// --- Errors ---
pub mod error;
pub use error::UtilsError;

// --- Output naming ---
pub mod naming;
pub use naming::{capitalize_label_set, format_float};

// --- Feature-gated utilities ---

/// Directory and data-file helpers.
///
/// Enabled by `path_utils_feature`.
#[cfg(feature = "path_utils_feature")]
pub mod path;
#[cfg(feature = "path_utils_feature")]
pub use path::{ensure_dir_exists, require_file};

/// Logger initialisation.
///
/// Enabled by `logger_utils_feature`.
#[cfg(feature = "logger_utils_feature")]
pub mod logger;
#[cfg(feature = "logger_utils_feature")]
pub use logger::{init_tracing_logger, parse_level};

/// Application configuration.
///
/// Enabled by `config_toml`.
#[cfg(feature = "config_toml")]
pub mod config;
#[cfg(feature = "config_toml")]
pub use config::AppConfig;
