//! Error type of the training engine.

use core_burn::BurnCoreError;
use expression_loader::LoaderError;
use thiserror::Error;
use utils_crate::UtilsError;

/// Errors of the training engine and the experiment pipelines.
#[derive(Error, Debug)]
pub enum TrainingError {
    /// Unusable hyperparameters or run settings.
    #[error("Invalid training configuration: {0}")]
    InvalidConfig(String),

    /// Optimizer name other than `SGD` or `AdamW`.
    #[error("Unknown optimizer '{0}' (expected 'SGD' or 'AdamW')")]
    UnknownOptimizer(String),

    /// Learning-rate schedule queried past its last step.
    #[error("Learning-rate schedule has {total_steps} steps, step {step} requested")]
    ScheduleExhausted {
        /// Requested step (0-based).
        step: usize,
        /// Configured number of steps.
        total_steps: usize,
    },

    /// Inputs, labels or matrices that do not fit together.
    #[error("Data mismatch: {0}")]
    DataMismatch(String),

    /// A label that is not one of the known classes.
    #[error("Unknown label '{0}'")]
    UnknownLabel(String),

    /// Requested device not available with the compiled backend.
    #[error("Device not supported: {0}")]
    UnsupportedDevice(String),

    /// Failure writing a result table.
    #[error("Failed to write '{path}': {source}")]
    Report {
        /// Output file.
        path: String,
        /// Underlying CSV/I/O error.
        #[source]
        source: csv::Error,
    },

    /// Error from the expression loader.
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// Error from the model layer.
    #[error(transparent)]
    Model(#[from] BurnCoreError),

    /// Error from shared utilities.
    #[error(transparent)]
    Utils(#[from] UtilsError),
}
