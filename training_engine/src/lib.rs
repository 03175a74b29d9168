#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]
#![allow(clippy::module_name_repetitions)]

//! # `training_engine`
//!
//! Trains the voxel MLP classifiers and runs the two experiments built on
//! them.
//!
//! - `trainer`: mini-batch training with a one-cycle learning rate and
//!   per-epoch history (`history`), plus inference on the fitted network.
//! - `resampling` / `grid`: gene-level train/validation draws and the
//!   hyperparameter sweep.
//! - `experiments`: the `mlp-validation-resampling` and `train-mlp` pipelines.
//! - `report`: CSV result tables.
//! - `backend`: compile-time burn backend (`ndarray_backend` or `tch_backend`).

pub mod backend;
pub mod data;
pub mod encoding;
pub mod error;
pub mod experiments;
pub mod grid;
pub mod history;
pub mod metrics;
pub mod optimizer;
pub mod preprocess;
pub mod report;
pub mod resampling;
pub mod schedule;
pub mod trainer;

pub use backend::{DeviceKind, InnerBackend, TrainBackend, TrainDevice};
pub use data::Dataset;
pub use encoding::LabelEncoder;
pub use error::TrainingError;
pub use experiments::{
    training::{run_train_mlp, TrainConfig, TrainOutcome, DEFAULT_IG_REGIONS},
    validation::{run_validation_resampling, ValidationConfig, ValidationOutcome},
};
pub use grid::{HyperparameterGrid, ParameterSet};
pub use history::{EpochRecord, History};
pub use optimizer::OptimizerKind;
pub use resampling::{build_train_validation_sets, ResamplingSummary, TrainValidationSets};
pub use schedule::OneCycleLr;
pub use trainer::{FitOutcome, TrainedClassifier, Trainer, TrainerConfig};
