//! Command-line flags of both tools.
//!
//! Flag names and defaults match the scripts the result tables were first
//! produced with, so existing job files keep working (`--L2`,
//! `--confusionmatrix true`, space-separated value lists).

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};
use training_engine::{
    HyperparameterGrid, OptimizerKind, TrainConfig, TrainerConfig, ValidationConfig, DEFAULT_IG_REGIONS,
};
use utils_crate::AppConfig;

use crate::setup::device;

/// Cross-validates hyperparameter combinations over coronal/sagittal
/// resamples of the voxel data.
#[derive(Parser, Debug)]
#[command(name = "mlp-validation-resampling", version, about)]
pub struct ValidationArgs {
    /// Directory containing input data.
    #[arg(long, default_value = "data/")]
    pub datadir: PathBuf,

    /// Directory in which to write neural net outcomes.
    #[arg(long, default_value = "data/MLP_outcomes/")]
    pub outdir: PathBuf,

    /// Performance table name [default: MLP_validation_resampling_{labels}.csv].
    #[arg(long)]
    pub outfile: Option<String>,

    /// Class of labels on which to train.
    #[arg(long, default_value = "region5",
          value_parser = ["region5", "region11", "region28", "region46", "region67", "region130"])]
    pub labels: String,

    /// Numbers of hidden units to tune over.
    #[arg(long, num_args = 1.., default_values_t = [500])]
    pub nunits: Vec<usize>,

    /// Numbers of hidden layers to tune over.
    #[arg(long, num_args = 1.., default_values_t = [4])]
    pub nlayers: Vec<usize>,

    /// Dropout rates to tune over.
    #[arg(long, num_args = 1.., default_values_t = [0.0])]
    pub dropout: Vec<f64>,

    /// Weight decay values to tune over.
    #[arg(long = "L2", num_args = 1.., default_values_t = [0.0])]
    pub l2: Vec<f64>,

    /// Number of times to train and evaluate each hyperparameter combination.
    #[arg(long, default_value_t = 1)]
    pub nsamples: u64,

    /// Numbers of epochs to train over.
    #[arg(long, num_args = 1.., default_values_t = [200])]
    pub nepochs: Vec<usize>,

    /// Peak learning rates.
    #[arg(long, num_args = 1.., default_values_t = [1e-5])]
    pub learningrate: Vec<f64>,

    /// One-cycle schedule lengths [default: the epoch count].
    #[arg(long, num_args = 1..)]
    pub totalsteps: Option<Vec<usize>>,

    /// Optimizers (SGD, AdamW).
    #[arg(long, num_args = 1.., default_values_t = [OptimizerKind::Sgd])]
    pub optimizer: Vec<OptimizerKind>,

    /// Write a validation confusion matrix for every fit.
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    pub confusionmatrix: bool,

    /// Random seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// TOML file with `[logging]` and `[training]` settings.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ValidationArgs {
    /// Run settings from the flags plus the `[training]` section of `app`.
    ///
    /// # Errors
    /// For an unknown device name.
    pub fn into_config(self, app: &AppConfig) -> Result<ValidationConfig> {
        Ok(ValidationConfig {
            data_dir: self.datadir,
            out_dir: self.outdir,
            outfile: self.outfile,
            labels: self.labels,
            grid: HyperparameterGrid {
                samples: (1..=self.nsamples).collect(),
                hidden_units: self.nunits,
                hidden_layers: self.nlayers,
                dropout: self.dropout,
                weight_decay: self.l2,
                max_epochs: self.nepochs,
                total_steps: self.totalsteps,
                learning_rate: self.learningrate,
                optimizer: self.optimizer,
            },
            confusion_matrix: self.confusionmatrix,
            seed: self.seed,
            batch_size: app.training.batch_size,
            device: device(app)?,
        })
    }
}

/// Trains the voxel classifier and applies it to mouse and human data.
#[derive(Parser, Debug)]
#[command(name = "train-mlp", version, about)]
pub struct TrainArgs {
    /// Directory containing input data.
    #[arg(long, default_value = "data/")]
    pub datadir: PathBuf,

    /// Directory in which to write neural net outcomes.
    #[arg(long, default_value = "data/MLP_outcomes/")]
    pub outdir: PathBuf,

    /// Class of labels on which to train.
    #[arg(long, default_value = "region5",
          value_parser = ["region5", "region11", "region28", "region46", "region67", "region134"])]
    pub labels: String,

    /// Mouse regional data to apply the network to.
    #[arg(long, default_value = "region134",
          value_parser = ["region5", "region11", "region28", "region46", "region67", "region134"])]
    pub mousedata: String,

    /// Human regional data to apply the network to.
    #[arg(long, default_value = "region166",
          value_parser = ["region5", "region16", "region56", "region79", "region88", "region166"])]
    pub humandata: String,

    /// Number of hidden units.
    #[arg(long, default_value_t = 500)]
    pub nunits: usize,

    /// Number of hidden layers.
    #[arg(long, default_value_t = 3)]
    pub nlayers: usize,

    /// Dropout rate.
    #[arg(long, default_value_t = 0.0)]
    pub dropout: f64,

    /// Weight decay.
    #[arg(long = "L2", default_value_t = 1e-6)]
    pub l2: f64,

    /// Number of epochs.
    #[arg(long, default_value_t = 200)]
    pub nepochs: usize,

    /// Peak learning rate.
    #[arg(long, default_value_t = 1e-5)]
    pub learningrate: f64,

    /// One-cycle schedule length [default: the epoch count].
    #[arg(long)]
    pub totalsteps: Option<usize>,

    /// Optimizer (SGD, AdamW).
    #[arg(long, default_value_t = OptimizerKind::Sgd)]
    pub optimizer: OptimizerKind,

    /// Write the training confusion matrix.
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    pub confusionmatrix: bool,

    /// Write latent transforms of every mouse voxel and human sample.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub voxeltransform: bool,

    /// Compute integrated-gradient attributions.
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    pub integratedgrads: bool,

    /// Target regions of the attributions.
    #[arg(long, num_args = 1.., default_values_t = DEFAULT_IG_REGIONS.map(String::from))]
    pub igregions: Vec<String>,

    /// Random seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// TOML file with `[logging]` and `[training]` settings.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl TrainArgs {
    /// Run settings from the flags plus the `[training]` section of `app`.
    ///
    /// # Errors
    /// For an unknown device name.
    pub fn into_config(self, app: &AppConfig) -> Result<TrainConfig> {
        Ok(TrainConfig {
            data_dir: self.datadir,
            out_dir: self.outdir,
            labels: self.labels,
            mouse_data: self.mousedata,
            human_data: self.humandata,
            trainer: TrainerConfig {
                hidden_units: self.nunits,
                hidden_layers: self.nlayers,
                dropout: self.dropout,
                weight_decay: self.l2,
                max_epochs: self.nepochs,
                total_steps: self.totalsteps,
                learning_rate: self.learningrate,
                optimizer: self.optimizer,
                batch_size: app.training.batch_size,
                seed: self.seed,
            },
            confusion_matrix: self.confusionmatrix,
            voxel_transform: self.voxeltransform,
            integrated_gradients: self.integratedgrads,
            ig_regions: self.igregions,
            ig_steps: app.training.integrated_gradient_steps,
            device: device(app)?,
        })
    }
}
