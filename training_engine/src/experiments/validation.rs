//! Resampling cross-validation of the voxel classifier.
//!
//! Every sample draws a fresh gene-level split of the coronal and sagittal
//! assays (see [`crate::resampling`]); every hyperparameter combination is
//! then trained on the training matrix and scored on the validation matrix
//! after each epoch. The epoch histories of all fits end up in one table.

use std::path::PathBuf;

use expression_loader::{
    files,
    genes::{columns_in_set, gene_set, intersect},
    is_label_column, ExpressionLoader,
};
use tracing::{debug, info};
use utils_crate::{capitalize_label_set, ensure_dir_exists};

use super::{check_same_voxels, load_data_file};
use crate::{
    backend::{describe, device_for, DeviceKind, TrainBackend},
    data::Dataset,
    encoding::LabelEncoder,
    error::TrainingError,
    grid::{HyperparameterGrid, ParameterSet},
    metrics::confusion_matrix,
    preprocess::scale_then_center,
    report::{write_confusion_matrix, write_performance, PerformanceRow},
    resampling::build_train_validation_sets,
    trainer::Trainer,
};

/// Settings of a resampling run.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Directory with the input matrices.
    pub data_dir: PathBuf,
    /// Directory receiving the result tables.
    pub out_dir: PathBuf,
    /// Performance table name; `MLP_validation_resampling_{labels}.csv` when `None`.
    pub outfile: Option<String>,
    /// Label set, e.g. `region67`.
    pub labels: String,
    /// Samples and hyperparameters to sweep.
    pub grid: HyperparameterGrid,
    /// Also write a validation confusion matrix per fit.
    pub confusion_matrix: bool,
    /// Seed applied before every fit.
    pub seed: Option<u64>,
    /// Mini-batch size.
    pub batch_size: usize,
    /// Compute device.
    pub device: DeviceKind,
}

impl ValidationConfig {
    /// Performance table path.
    #[must_use]
    pub fn outfile_path(&self) -> PathBuf {
        let name = self
            .outfile
            .clone()
            .unwrap_or_else(|| format!("MLP_validation_resampling_{}.csv", self.labels));
        self.out_dir.join(name)
    }

    fn confusion_matrix_path(&self, parameters: &ParameterSet) -> PathBuf {
        self.out_dir.join(format!(
            "MLP_validation_resampling_ConfusionMatrix_{}_Sample{}_ParameterSet{}.csv",
            capitalize_label_set(&self.labels),
            parameters.sample,
            parameters.parameter_set
        ))
    }
}

/// What a resampling run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    /// The performance table that was written.
    pub performance_path: PathBuf,
    /// Its rows.
    pub rows: Vec<PerformanceRow>,
    /// Confusion matrices written, if requested.
    pub confusion_matrices: Vec<PathBuf>,
}

/// Runs the full resampling sweep and writes the performance table.
///
/// # Errors
/// Any loader, data, training or report error; nothing is written to the
/// performance table unless every fit succeeds.
pub fn run_validation_resampling(config: &ValidationConfig) -> Result<ValidationOutcome, TrainingError> {
    ensure_dir_exists(&config.out_dir)?;
    let parameter_sets = config.grid.expand()?;
    let device = device_for(config.device)?;

    info!("Importing data sets...");
    let reference_path = files::locate(&config.data_dir, files::CORONAL_REFERENCE)?;
    let reference_header = ExpressionLoader::read_header(&reference_path)?;
    let sagittal = load_data_file(&config.data_dir, files::SAGITTAL)?;
    let coronal = load_data_file(&config.data_dir, files::CORONAL_SAGITTAL_MASK)?;
    check_same_voxels(files::CORONAL_SAGITTAL_MASK, &coronal, files::SAGITTAL, &sagittal)?;

    info!("Cleaning and preparing data...");
    let reference_genes: Vec<&String> = reference_header
        .iter()
        .filter(|h| !is_label_column(h))
        .collect();
    let genes = intersect(&[
        gene_set(&reference_genes),
        gene_set(coronal.inputs.columns()),
        gene_set(sagittal.inputs.columns()),
    ]);
    if genes.is_empty() {
        return Err(TrainingError::DataMismatch(
            "reference, coronal and sagittal assays share no genes".into(),
        ));
    }
    let coronal_inputs = coronal
        .inputs
        .select_columns(&columns_in_set(coronal.inputs.columns(), &genes));
    let sagittal_inputs = sagittal
        .inputs
        .select_columns(&columns_in_set(sagittal.inputs.columns(), &genes));
    info!(
        "{} shared genes ({} coronal columns, {} sagittal columns)",
        genes.len(),
        coronal_inputs.n_cols(),
        sagittal_inputs.n_cols()
    );

    let label_column = capitalize_label_set(&config.labels);
    let labels = coronal.label_column(&label_column)?;
    let encoder = LabelEncoder::fit(labels);
    let targets = encoder.encode(labels)?;
    info!("Using labels {}: {} classes", label_column, encoder.n_classes());

    info!("Beginning training and validation...");
    let mut rows = Vec::new();
    let mut confusion_matrices = Vec::new();
    for sample_sets in parameter_sets.chunk_by(|a, b| a.sample == b.sample) {
        let sample = sample_sets[0].sample;
        info!("On sample {}", sample);

        let sets = build_train_validation_sets(&coronal_inputs, &sagittal_inputs, sample)?;
        debug!("Resampling summary: {:?}", sets.summary);
        let train = Dataset::new(scale_then_center(sets.training), targets.clone())?;
        let valid = Dataset::new(scale_then_center(sets.validation), targets.clone())?;

        for parameters in sample_sets {
            log_parameters(&label_column, parameters);
            let trainer = Trainer::new(
                parameters.trainer_config(config.batch_size, config.seed),
                encoder.n_classes(),
            );
            info!("Training network using {}...", describe(config.device));
            let outcome = trainer.fit::<TrainBackend>(&train, Some(&valid), &device)?;

            if config.confusion_matrix {
                let predicted = outcome.classifier.predict(valid.features())?;
                let matrix = confusion_matrix(valid.targets(), &predicted, encoder.n_classes())?;
                let path = config.confusion_matrix_path(parameters);
                write_confusion_matrix(&path, &matrix, encoder.classes(), "TrueLabels")?;
                confusion_matrices.push(path);
            }

            rows.extend(outcome.history.records().iter().map(|epoch| PerformanceRow {
                parameters: parameters.clone(),
                epoch: epoch.clone(),
            }));
        }
    }

    let performance_path = config.outfile_path();
    write_performance(&performance_path, &rows)?;
    Ok(ValidationOutcome {
        performance_path,
        rows,
        confusion_matrices,
    })
}

fn log_parameters(label_column: &str, p: &ParameterSet) {
    info!(
        "Parameter set {}: labels {}, hidden units {}, hidden layers {}, dropout {}, L2 {}, max epochs {}, total steps {}, learning rate {}, optimizer {}",
        p.parameter_set,
        label_column,
        p.hidden_units,
        p.hidden_layers,
        p.dropout,
        p.weight_decay,
        p.max_epochs,
        p.total_steps,
        p.learning_rate,
        p.optimizer
    );
}
