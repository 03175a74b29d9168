//! Hyperparameter grid expansion.

use crate::{error::TrainingError, optimizer::OptimizerKind, trainer::TrainerConfig};

/// Candidate values for every swept hyperparameter.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperparameterGrid {
    /// Resample indices (also the resampling seeds).
    pub samples: Vec<u64>,
    /// Hidden layer widths.
    pub hidden_units: Vec<usize>,
    /// Hidden layer counts.
    pub hidden_layers: Vec<usize>,
    /// Dropout probabilities.
    pub dropout: Vec<f64>,
    /// Weight decays.
    pub weight_decay: Vec<f64>,
    /// Epoch counts.
    pub max_epochs: Vec<usize>,
    /// One-cycle schedule lengths. `None` ties each combination's schedule
    /// to its own epoch count.
    pub total_steps: Option<Vec<usize>>,
    /// Peak learning rates.
    pub learning_rate: Vec<f64>,
    /// Optimizers.
    pub optimizer: Vec<OptimizerKind>,
}

/// One combination of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    /// Resample index.
    pub sample: u64,
    /// Hidden layer width.
    pub hidden_units: usize,
    /// Hidden layer count.
    pub hidden_layers: usize,
    /// Dropout probability.
    pub dropout: f64,
    /// Weight decay.
    pub weight_decay: f64,
    /// Epoch count.
    pub max_epochs: usize,
    /// Schedule length.
    pub total_steps: usize,
    /// Peak learning rate.
    pub learning_rate: f64,
    /// Optimizer.
    pub optimizer: OptimizerKind,
    /// 1-based position of the combination within its sample.
    pub parameter_set: usize,
}

impl ParameterSet {
    /// Trainer settings for this combination.
    #[must_use]
    pub const fn trainer_config(&self, batch_size: usize, seed: Option<u64>) -> TrainerConfig {
        TrainerConfig {
            hidden_units: self.hidden_units,
            hidden_layers: self.hidden_layers,
            dropout: self.dropout,
            weight_decay: self.weight_decay,
            max_epochs: self.max_epochs,
            total_steps: Some(self.total_steps),
            learning_rate: self.learning_rate,
            optimizer: self.optimizer,
            batch_size,
            seed,
        }
    }
}

impl HyperparameterGrid {
    /// All combinations, nested in field order with the last field varying
    /// fastest. Numbering restarts at 1 for every sample.
    ///
    /// # Errors
    /// `TrainingError::InvalidConfig` if a candidate list is empty.
    pub fn expand(&self) -> Result<Vec<ParameterSet>, TrainingError> {
        self.check_non_empty()?;

        let mut sets = Vec::with_capacity(self.len());
        for &sample in &self.samples {
            let mut parameter_set = 0;
            for &hidden_units in &self.hidden_units {
                for &hidden_layers in &self.hidden_layers {
                    for &dropout in &self.dropout {
                        for &weight_decay in &self.weight_decay {
                            for &max_epochs in &self.max_epochs {
                                let steps: &[usize] = match &self.total_steps {
                                    Some(steps) => steps,
                                    None => std::slice::from_ref(&max_epochs),
                                };
                                for &total_steps in steps {
                                    for &learning_rate in &self.learning_rate {
                                        for &optimizer in &self.optimizer {
                                            parameter_set += 1;
                                            sets.push(ParameterSet {
                                                sample,
                                                hidden_units,
                                                hidden_layers,
                                                dropout,
                                                weight_decay,
                                                max_epochs,
                                                total_steps,
                                                learning_rate,
                                                optimizer,
                                                parameter_set,
                                            });
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        Ok(sets)
    }

    /// Number of combinations the grid expands to.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
            * self.hidden_units.len()
            * self.hidden_layers.len()
            * self.dropout.len()
            * self.weight_decay.len()
            * self.max_epochs.len()
            * self.total_steps.as_ref().map_or(1, Vec::len)
            * self.learning_rate.len()
            * self.optimizer.len()
    }

    /// Whether the grid has no combinations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_non_empty(&self) -> Result<(), TrainingError> {
        let lists = [
            ("samples", self.samples.len()),
            ("hidden_units", self.hidden_units.len()),
            ("hidden_layers", self.hidden_layers.len()),
            ("dropout", self.dropout.len()),
            ("weight_decay", self.weight_decay.len()),
            ("max_epochs", self.max_epochs.len()),
            ("total_steps", self.total_steps.as_ref().map_or(1, Vec::len)),
            ("learning_rate", self.learning_rate.len()),
            ("optimizer", self.optimizer.len()),
        ];
        let empty: Vec<&str> = lists.iter().filter(|(_, n)| *n == 0).map(|(name, _)| *name).collect();
        if empty.is_empty() {
            Ok(())
        } else {
            Err(TrainingError::InvalidConfig(format!(
                "empty hyperparameter list(s): {}",
                empty.join(", ")
            )))
        }
    }
}
