//! Trains one classifier on every labelled voxel and exports what the
//! downstream mouse/human comparison needs: class probabilities and latent
//! representations of the regional matrices, optionally the training
//! confusion matrix, integrated-gradient attributions and voxel/sample
//! transforms.

use std::path::PathBuf;

use core_burn::IntegratedGradients;
use expression_loader::{files, ExpressionMatrix};
use tracing::info;
use utils_crate::{capitalize_label_set, ensure_dir_exists};

use super::{load_data_file, model_stem};
use crate::{
    backend::{describe, device_for, DeviceKind, TrainBackend},
    data::Dataset,
    encoding::LabelEncoder,
    error::TrainingError,
    metrics::{accuracy, confusion_matrix},
    report::{write_confusion_matrix, write_labelled_matrix},
    trainer::{Trainer, TrainerConfig},
};

/// Regions attributed when none are given.
pub const DEFAULT_IG_REGIONS: [&str; 3] = ["Caudoputamen", "Primary motor area", "Infralimbic area"];

/// Settings of a train-mlp run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    /// Directory with the input matrices.
    pub data_dir: PathBuf,
    /// Directory receiving the outputs.
    pub out_dir: PathBuf,
    /// Voxel label set to train on, e.g. `region67`.
    pub labels: String,
    /// Mouse regional label set to apply the network to.
    pub mouse_data: String,
    /// Human regional label set to apply the network to.
    pub human_data: String,
    /// Network and optimisation settings.
    pub trainer: TrainerConfig,
    /// Write the training confusion matrix.
    pub confusion_matrix: bool,
    /// Write latent transforms of every mouse voxel and human sample.
    pub voxel_transform: bool,
    /// Write integrated-gradient attributions for `ig_regions`.
    pub integrated_gradients: bool,
    /// Target regions of the attributions.
    pub ig_regions: Vec<String>,
    /// Integration points per attribution.
    pub ig_steps: usize,
    /// Compute device.
    pub device: DeviceKind,
}

impl TrainConfig {
    fn stem(&self) -> String {
        model_stem(
            &capitalize_label_set(&self.labels),
            self.trainer.hidden_layers,
            self.trainer.hidden_units,
            self.trainer.weight_decay,
        )
    }

    fn output(&self, suffix: &str) -> PathBuf {
        self.out_dir.join(format!("MLP_{}_{suffix}.csv", self.stem()))
    }
}

/// Files written by [`run_train_mlp`] and the training accuracy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrainOutcome {
    /// Accuracy on the training voxels.
    pub training_accuracy: f64,
    /// Every file written, in write order.
    pub written: Vec<PathBuf>,
}

/// Trains the voxel classifier and writes its outputs.
///
/// # Errors
/// Any loader, data, training or report error. An attribution region that is
/// not a class of `labels` is `TrainingError::UnknownLabel`.
#[allow(clippy::too_many_lines)]
pub fn run_train_mlp(config: &TrainConfig) -> Result<TrainOutcome, TrainingError> {
    ensure_dir_exists(&config.out_dir)?;
    let device = device_for(config.device)?;
    let attribution = if config.integrated_gradients {
        Some(IntegratedGradients::new(config.ig_steps)?)
    } else {
        None
    };

    info!("Importing data...");
    let mouse_file = files::mouse_roi(&config.mouse_data);
    let human_file = files::human_roi(&config.human_data);
    let voxels = load_data_file(&config.data_dir, files::TRAINING_VOXELS)?;
    let mouse = load_data_file(&config.data_dir, &mouse_file)?;
    let human = load_data_file(&config.data_dir, &human_file)?;

    info!("Preparing data for learning...");
    let gene_indices: Vec<usize> = voxels
        .inputs
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, gene)| human.inputs.column_index(gene).is_some())
        .map(|(j, _)| j)
        .collect();
    if gene_indices.is_empty() {
        return Err(TrainingError::DataMismatch(format!(
            "no voxel genes are present in {human_file}"
        )));
    }
    let inputs = voxels.inputs.select_columns(&gene_indices);
    let genes = inputs.columns().to_vec();
    let mouse_inputs = mouse.inputs.select_by_names(&genes)?;
    let human_inputs = human.inputs.select_by_names(&genes)?;
    info!("{} genes shared with {}", genes.len(), human_file);

    let label_column = capitalize_label_set(&config.labels);
    info!("Using labels: {}", label_column);
    let labels = voxels.label_column(&label_column)?;
    let encoder = LabelEncoder::fit(labels);
    let targets = encoder.encode(labels)?;
    let train = Dataset::new(inputs, targets)?;

    info!("Initializing neural network...");
    let trainer = Trainer::new(config.trainer.clone(), encoder.n_classes());
    info!("Training network using {}...", describe(config.device));
    let classifier = trainer.fit::<TrainBackend>(&train, None, &device)?.classifier;

    let predicted = classifier.predict(train.features())?;
    let training_accuracy = accuracy(train.targets(), &predicted)?;
    info!("Training accuracy: {}", training_accuracy);

    let mut written = Vec::new();

    if config.confusion_matrix {
        info!("Computing confusion matrix from training set...");
        let matrix = confusion_matrix(train.targets(), &predicted, encoder.n_classes())?;
        let path = config
            .out_dir
            .join(format!("MLP_ConfusionMatrix_Training_{}.csv", config.stem()));
        write_confusion_matrix(&path, &matrix, encoder.classes(), "TrueLabels")?;
        written.push(path);
    }

    if let Some(method) = attribution {
        let mut values = Vec::with_capacity(config.ig_regions.len() * genes.len());
        for region in &config.ig_regions {
            info!("Computing integrated gradients for region: {}", region);
            let target = encoder
                .index_of(region)
                .ok_or_else(|| TrainingError::UnknownLabel(region.clone()))?;
            values.extend(classifier.mean_attribution(train.features(), target, &method)?);
        }
        let attributions = ExpressionMatrix::new(genes.clone(), config.ig_regions.len(), values)?;
        let path = config.output("IntegratedGradients");
        write_labelled_matrix(&path, &attributions, "Region", &config.ig_regions)?;
        written.push(path);
    }

    info!("Applying trained network to mouse and human data...");
    let mouse_regions = mouse.label_column("Region")?;
    let human_regions = human.label_column("Region")?;
    let mouse_suffix = capitalize_label_set(&config.mouse_data);
    let human_suffix = capitalize_label_set(&config.human_data);

    let outputs: [(String, ExpressionMatrix, &str, &[String]); 4] = [
        (
            format!("MouseProb_{mouse_suffix}"),
            classifier.predict_proba(&mouse_inputs, encoder.classes())?,
            "TrueLabel",
            mouse_regions,
        ),
        (
            format!("HumanProb_{human_suffix}"),
            classifier.predict_proba(&human_inputs, encoder.classes())?,
            "TrueLabel",
            human_regions,
        ),
        (
            format!("MouseTx_{mouse_suffix}"),
            classifier.transform_latent(&mouse_inputs)?,
            "Region",
            mouse_regions,
        ),
        (
            format!("HumanTx_{human_suffix}"),
            classifier.transform_latent(&human_inputs)?,
            "Region",
            human_regions,
        ),
    ];
    for (suffix, matrix, header, rows) in &outputs {
        let path = config.output(suffix);
        write_labelled_matrix(&path, matrix, header, rows)?;
        written.push(path);
    }

    if config.voxel_transform {
        let path = config.output("MouseVoxelTx");
        write_labelled_matrix(&path, &classifier.transform_latent(train.features())?, "Region", labels)?;
        written.push(path);

        let samples = load_data_file(&config.data_dir, files::HUMAN_SAMPLES)?;
        let sample_inputs = samples.inputs.select_by_names(&genes)?;
        let sample_regions = samples.label_column(&human_suffix)?;
        let path = config.output("HumanVoxelTx");
        write_labelled_matrix(&path, &classifier.transform_latent(&sample_inputs)?, "Region", sample_regions)?;
        written.push(path);
    }

    Ok(TrainOutcome {
        training_accuracy,
        written,
    })
}
