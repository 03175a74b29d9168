use thiserror::Error;

/// Common error type for `utils_crate`, also reused by the binaries as the
/// innermost error of configuration and filesystem problems.
#[derive(Error, Debug)]
pub enum UtilsError {
    /// I/O failure, optionally tied to the path that caused it.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        source: std::io::Error,
        /// Path involved in the failure, when known.
        path: Option<String>,
    },

    /// Invalid or unreadable application configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A utility function was handed an unusable argument.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A required input file or directory does not exist.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Anything not covered above.
    #[error("Utility error: {0}")]
    Generic(String),
}

impl From<std::io::Error> for UtilsError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source, path: None }
    }
}

#[cfg(feature = "config_toml")]
impl From<toml::de::Error> for UtilsError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("TOML parse error: {err}"))
    }
}

impl UtilsError {
    /// Builds `UtilsError::Io` carrying the offending path.
    ///
    /// # Arguments
    ///
    /// * `source` - The underlying `std::io::Error`.
    /// * `path` - Path the operation was working on.
    pub fn io_with_path(source: std::io::Error, path: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: Some(path.into()),
        }
    }
}
