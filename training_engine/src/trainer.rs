//! Mini-batch training of `MlpClassifier` with per-epoch scoring.

use std::time::Instant;

use burn::{
    module::AutodiffModule,
    nn::loss::CrossEntropyLossConfig,
    optim::{decay::WeightDecayConfig, AdamWConfig, GradientsParams, Optimizer, SgdConfig},
    tensor::{
        backend::{AutodiffBackend, Backend},
        ElementConversion, Tensor,
    },
};
use core_burn::{mean_over_samples, IntegratedGradients, MlpClassifier, MlpClassifierConfig};
use expression_loader::ExpressionMatrix;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::{
    data::{argmax_rows, index_tensor, matrix_to_tensor, tensor_values, Dataset},
    error::TrainingError,
    history::{EpochMeasurement, History},
    metrics::accuracy,
    optimizer::OptimizerKind,
    schedule::OneCycleLr,
};

/// Hyperparameters and run settings of one fit.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    /// Width of every hidden layer.
    pub hidden_units: usize,
    /// Number of hidden layers.
    pub hidden_layers: usize,
    /// Dropout probability after each hidden activation.
    pub dropout: f64,
    /// Weight decay (L2 penalty for SGD, decoupled for AdamW).
    pub weight_decay: f64,
    /// Number of epochs.
    pub max_epochs: usize,
    /// Length of the one-cycle schedule; `max_epochs` when `None`.
    pub total_steps: Option<usize>,
    /// Peak learning rate of the one-cycle schedule.
    pub learning_rate: f64,
    /// Optimizer.
    pub optimizer: OptimizerKind,
    /// Mini-batch size.
    pub batch_size: usize,
    /// Seed for weight initialisation, dropout and shuffling.
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            hidden_units: 500,
            hidden_layers: 3,
            dropout: 0.0,
            weight_decay: 0.0,
            max_epochs: 200,
            total_steps: None,
            learning_rate: 1e-5,
            optimizer: OptimizerKind::Sgd,
            batch_size: 128,
            seed: None,
        }
    }
}

impl TrainerConfig {
    /// Schedule length actually used.
    #[must_use]
    pub fn schedule_steps(&self) -> usize {
        self.total_steps.unwrap_or(self.max_epochs)
    }

    /// Checks the settings before any tensor is allocated.
    ///
    /// # Errors
    /// `TrainingError::InvalidConfig` listing every problem.
    pub fn validate(&self) -> Result<(), TrainingError> {
        let mut errors: Vec<String> = Vec::new();
        if self.batch_size == 0 {
            errors.push("batch_size must be positive".into());
        }
        if self.max_epochs == 0 {
            errors.push("max_epochs must be positive".into());
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            errors.push(format!("learning_rate must be positive, got {}", self.learning_rate));
        }
        if !(self.weight_decay.is_finite() && self.weight_decay >= 0.0) {
            errors.push(format!("weight_decay must be non-negative, got {}", self.weight_decay));
        }
        if self.schedule_steps() < self.max_epochs {
            errors.push(format!(
                "total_steps ({}) must be at least max_epochs ({})",
                self.schedule_steps(),
                self.max_epochs
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(TrainingError::InvalidConfig(errors.join("; ")))
        }
    }
}

/// Result of [`Trainer::fit`].
#[derive(Debug)]
pub struct FitOutcome<B: AutodiffBackend> {
    /// The trained network.
    pub classifier: TrainedClassifier<B>,
    /// One record per epoch.
    pub history: History,
}

/// Fits an `MlpClassifier` for a fixed number of classes.
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainerConfig,
    n_classes: usize,
}

impl Trainer {
    /// Trainer for `n_classes` output classes.
    #[must_use]
    pub const fn new(config: TrainerConfig, n_classes: usize) -> Self {
        Self { config, n_classes }
    }

    /// Settings of this trainer.
    #[must_use]
    pub const fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Trains a fresh network on `train`, scoring `validation` after every
    /// epoch when given.
    ///
    /// # Errors
    /// `InvalidConfig` for bad settings, `DataMismatch` for empty data,
    /// mismatched widths or out-of-range targets, `Model` if the network
    /// cannot be built.
    pub fn fit<B: AutodiffBackend>(
        &self,
        train: &Dataset,
        validation: Option<&Dataset>,
        device: &B::Device,
    ) -> Result<FitOutcome<B>, TrainingError> {
        self.config.validate()?;
        self.check_dataset("training", train, train.n_features())?;
        if let Some(valid) = validation {
            self.check_dataset("validation", valid, train.n_features())?;
        }

        if let Some(seed) = self.config.seed {
            B::seed(seed);
        }

        let model = MlpClassifierConfig::new(train.n_features(), self.n_classes)
            .with_hidden_units(self.config.hidden_units)
            .with_num_hidden(self.config.hidden_layers)
            .with_dropout(self.config.dropout)
            .init::<B>(device)?;
        let schedule = OneCycleLr::new(self.config.learning_rate, self.config.schedule_steps())?;

        #[allow(clippy::cast_possible_truncation)]
        let weight_decay = self.config.weight_decay as f32;
        match self.config.optimizer {
            OptimizerKind::Sgd => {
                let sgd = if weight_decay > 0.0 {
                    SgdConfig::new().with_weight_decay(Some(WeightDecayConfig::new(weight_decay)))
                } else {
                    SgdConfig::new()
                };
                self.run(model, sgd.init::<B, MlpClassifier<B>>(), &schedule, train, validation, device)
            }
            OptimizerKind::AdamW => {
                let adamw = AdamWConfig::new()
                    .with_weight_decay(weight_decay)
                    .with_epsilon(1e-8);
                self.run(model, adamw.init::<B, MlpClassifier<B>>(), &schedule, train, validation, device)
            }
        }
    }

    fn check_dataset(&self, name: &str, data: &Dataset, n_features: usize) -> Result<(), TrainingError> {
        if data.is_empty() {
            return Err(TrainingError::DataMismatch(format!("{name} set is empty")));
        }
        if data.n_features() != n_features {
            return Err(TrainingError::DataMismatch(format!(
                "{name} set has {} features, expected {n_features}",
                data.n_features()
            )));
        }
        if let Some(bad) = data.targets().iter().find(|&&t| t >= self.n_classes) {
            return Err(TrainingError::DataMismatch(format!(
                "{name} target {bad} out of range for {} classes",
                self.n_classes
            )));
        }
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn run<B, O>(
        &self,
        mut model: MlpClassifier<B>,
        mut optim: O,
        schedule: &OneCycleLr,
        train: &Dataset,
        validation: Option<&Dataset>,
        device: &B::Device,
    ) -> Result<FitOutcome<B>, TrainingError>
    where
        B: AutodiffBackend,
        O: Optimizer<MlpClassifier<B>, B>,
    {
        let batch_size = self.config.batch_size;
        let train_x = matrix_to_tensor::<B::InnerBackend>(train.features(), device);
        let valid_x = validation.map(|v| matrix_to_tensor::<B::InnerBackend>(v.features(), device));
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed.unwrap_or_else(rand::random));

        let n = train.len();
        let mut order: Vec<usize> = (0..n).collect();
        let mut history = History::default();

        for epoch in 0..self.config.max_epochs {
            let started = Instant::now();
            let lr = schedule.lr_at(epoch)?;
            order.shuffle(&mut rng);

            let mut loss_sum = 0.0;
            let mut train_batches = 0;
            for chunk in order.chunks(batch_size) {
                let rows = index_tensor::<B::InnerBackend>(chunk, device);
                let inputs = Tensor::<B, 2>::from_inner(train_x.clone().select(0, rows));
                let batch_targets: Vec<usize> = chunk.iter().map(|&i| train.targets()[i]).collect();
                let targets = index_tensor::<B>(&batch_targets, device);

                let loss = model.loss(inputs, targets);
                loss_sum += loss.clone().into_scalar().elem::<f64>() * chunk.len() as f64;
                let grads = GradientsParams::from_grads(loss.backward(), &model);
                model = optim.step(lr, model, grads);
                train_batches += 1;
            }

            let eval_model = model.valid();
            let (_, train_acc) = evaluate(&eval_model, &train_x, train.targets(), batch_size)?;
            let scores = match (validation, &valid_x) {
                (Some(valid), Some(x)) => Some(evaluate(&eval_model, x, valid.targets(), batch_size)?),
                _ => None,
            };

            let record = history.push(EpochMeasurement {
                train_batch_count: train_batches,
                valid_batch_count: validation.map_or(0, |v| v.len().div_ceil(batch_size)),
                dur: started.elapsed().as_secs_f64(),
                event_lr: lr,
                train_loss: loss_sum / n as f64,
                train_acc,
                validation: scores,
            });
            match (record.valid_loss, record.valid_acc) {
                (Some(valid_loss), Some(valid_acc)) => info!(
                    "epoch {:>4}/{}: train_loss {:.4}, train_acc {:.4}, valid_loss {:.4}, valid_acc {:.4}, lr {:.3e}, {:.2}s",
                    record.epoch,
                    self.config.max_epochs,
                    record.train_loss,
                    record.train_acc,
                    valid_loss,
                    valid_acc,
                    record.event_lr,
                    record.dur
                ),
                _ => info!(
                    "epoch {:>4}/{}: train_loss {:.4}, train_acc {:.4}, lr {:.3e}, {:.2}s",
                    record.epoch,
                    self.config.max_epochs,
                    record.train_loss,
                    record.train_acc,
                    record.event_lr,
                    record.dur
                ),
            }
        }

        Ok(FitOutcome {
            classifier: TrainedClassifier {
                model,
                n_features: train.n_features(),
                n_classes: self.n_classes,
                batch_size,
                device: device.clone(),
            },
            history,
        })
    }
}

/// Mean loss and accuracy of `model` over `x`, in chunks of `batch_size`.
#[allow(clippy::cast_precision_loss)]
fn evaluate<B: Backend>(
    model: &MlpClassifier<B>,
    x: &Tensor<B, 2>,
    targets: &[usize],
    batch_size: usize,
) -> Result<(f64, f64), TrainingError> {
    let n = targets.len();
    let [_, cols] = x.dims();
    let device = x.device();
    let loss_fn = CrossEntropyLossConfig::new().init(&device);

    let mut loss_sum = 0.0;
    let mut predictions = Vec::with_capacity(n);
    for start in (0..n).step_by(batch_size) {
        let end = (start + batch_size).min(n);
        let logits = model.forward(x.clone().slice([start..end, 0..cols]));
        let y = index_tensor::<B>(&targets[start..end], &device);
        loss_sum += loss_fn.forward(logits.clone(), y).into_scalar().elem::<f64>() * (end - start) as f64;
        predictions.extend(argmax_rows(logits));
    }
    Ok((loss_sum / n as f64, accuracy(targets, &predictions)?))
}

/// A fitted network, applied in evaluation mode.
#[derive(Debug)]
pub struct TrainedClassifier<B: AutodiffBackend> {
    model: MlpClassifier<B>,
    n_features: usize,
    n_classes: usize,
    batch_size: usize,
    device: B::Device,
}

impl<B: AutodiffBackend> TrainedClassifier<B> {
    /// Number of output classes.
    #[must_use]
    pub const fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Most probable class per row.
    ///
    /// # Errors
    /// `DataMismatch` if `inputs` is empty or has the wrong width.
    pub fn predict(&self, inputs: &ExpressionMatrix) -> Result<Vec<usize>, TrainingError> {
        let (scores, _) = self.run_chunked(inputs, |m, x| m.forward(x))?;
        Ok(scores
            .chunks(self.n_classes)
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold((0, f32::NEG_INFINITY), |best, (k, &v)| if v > best.1 { (k, v) } else { best })
                    .0
            })
            .collect())
    }

    /// Class probabilities, one column per class named by `class_names`.
    ///
    /// # Errors
    /// `DataMismatch` for bad input or a name count different from the
    /// class count.
    pub fn predict_proba(
        &self,
        inputs: &ExpressionMatrix,
        class_names: &[String],
    ) -> Result<ExpressionMatrix, TrainingError> {
        if class_names.len() != self.n_classes {
            return Err(TrainingError::DataMismatch(format!(
                "{} class names for {} classes",
                class_names.len(),
                self.n_classes
            )));
        }
        let (values, _) = self.run_chunked(inputs, |m, x| m.forward_probabilities(x))?;
        Ok(ExpressionMatrix::new(class_names.to_vec(), inputs.n_rows(), values)?)
    }

    /// Output of the last hidden layer, columns named `0`, `1`, ...
    ///
    /// # Errors
    /// `DataMismatch` for empty or mis-sized input.
    pub fn transform_latent(&self, inputs: &ExpressionMatrix) -> Result<ExpressionMatrix, TrainingError> {
        let (values, width) = self.run_chunked(inputs, |m, x| m.forward_latent(x))?;
        let columns = (0..width).map(|k| k.to_string()).collect();
        Ok(ExpressionMatrix::new(columns, inputs.n_rows(), values)?)
    }

    /// Integrated-gradient attribution of every input feature towards class
    /// `target`, averaged over the rows of `inputs`.
    ///
    /// # Errors
    /// `DataMismatch` for bad input or target, `Model` if attribution fails.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn mean_attribution(
        &self,
        inputs: &ExpressionMatrix,
        target: usize,
        method: &IntegratedGradients,
    ) -> Result<Vec<f32>, TrainingError> {
        self.check_width(inputs)?;
        if target >= self.n_classes {
            return Err(TrainingError::DataMismatch(format!(
                "target class {target} out of range for {} classes",
                self.n_classes
            )));
        }
        let n = inputs.n_rows();
        let cols = inputs.n_cols();
        let x = matrix_to_tensor::<B::InnerBackend>(inputs, &self.device);

        let mut sums = vec![0.0f64; cols];
        for start in (0..n).step_by(self.batch_size) {
            let end = (start + self.batch_size).min(n);
            let attributions = method.attribute(&self.model, x.clone().slice([start..end, 0..cols]), target)?;
            let chunk_len = (end - start) as f64;
            for (s, m) in sums.iter_mut().zip(mean_over_samples(attributions)) {
                *s += f64::from(m) * chunk_len;
            }
            debug!("attribution rows {}..{} of {}", start, end, n);
        }
        Ok(sums.into_iter().map(|s| (s / n as f64) as f32).collect())
    }

    fn check_width(&self, inputs: &ExpressionMatrix) -> Result<(), TrainingError> {
        if inputs.n_rows() == 0 {
            return Err(TrainingError::DataMismatch("no rows to evaluate".into()));
        }
        if inputs.n_cols() != self.n_features {
            return Err(TrainingError::DataMismatch(format!(
                "inputs have {} features, the network expects {}",
                inputs.n_cols(),
                self.n_features
            )));
        }
        Ok(())
    }

    fn run_chunked<F>(&self, inputs: &ExpressionMatrix, forward: F) -> Result<(Vec<f32>, usize), TrainingError>
    where
        F: Fn(&MlpClassifier<B::InnerBackend>, Tensor<B::InnerBackend, 2>) -> Tensor<B::InnerBackend, 2>,
    {
        self.check_width(inputs)?;
        let model = self.model.valid();
        let n = inputs.n_rows();
        let cols = inputs.n_cols();
        let x = matrix_to_tensor::<B::InnerBackend>(inputs, &self.device);

        let mut values = Vec::new();
        let mut width = 0;
        for start in (0..n).step_by(self.batch_size) {
            let end = (start + self.batch_size).min(n);
            let out = forward(&model, x.clone().slice([start..end, 0..cols]));
            width = out.dims()[1];
            values.extend(tensor_values(out));
        }
        Ok((values, width))
    }
}
