//! Optimizer choice.

use std::fmt;
use std::str::FromStr;

use crate::error::TrainingError;

/// Optimizers a parameter set can ask for.
///
/// `Sgd` applies weight decay as an L2 penalty added to the gradient;
/// `AdamW` decouples it from the adaptive update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptimizerKind {
    /// Stochastic gradient descent, no momentum.
    Sgd,
    /// Adam with decoupled weight decay.
    AdamW,
}

impl FromStr for OptimizerKind {
    type Err = TrainingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SGD" => Ok(Self::Sgd),
            "AdamW" => Ok(Self::AdamW),
            other => Err(TrainingError::UnknownOptimizer(other.to_string())),
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sgd => "SGD",
            Self::AdamW => "AdamW",
        })
    }
}
