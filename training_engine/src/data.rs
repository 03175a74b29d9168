//! Training/validation datasets and their tensor form.

use burn::tensor::{backend::Backend, Int, Tensor, TensorData};
use expression_loader::ExpressionMatrix;

use crate::error::TrainingError;

/// Features with one class index per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: ExpressionMatrix,
    targets: Vec<usize>,
}

impl Dataset {
    /// Pairs features with targets.
    ///
    /// # Errors
    /// `TrainingError::DataMismatch` if the row and target counts differ.
    pub fn new(features: ExpressionMatrix, targets: Vec<usize>) -> Result<Self, TrainingError> {
        if features.n_rows() != targets.len() {
            return Err(TrainingError::DataMismatch(format!(
                "{} feature rows but {} targets",
                features.n_rows(),
                targets.len()
            )));
        }
        Ok(Self { features, targets })
    }

    /// Feature matrix.
    #[must_use]
    pub const fn features(&self) -> &ExpressionMatrix {
        &self.features
    }

    /// Class index per row.
    #[must_use]
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.features.n_cols()
    }
}

/// Copies a matrix onto `device` as a `[rows, cols]` float tensor.
pub fn matrix_to_tensor<B: Backend>(matrix: &ExpressionMatrix, device: &B::Device) -> Tensor<B, 2> {
    Tensor::from_data(
        TensorData::new(matrix.values().to_vec(), [matrix.n_rows(), matrix.n_cols()]),
        device,
    )
}

/// Integer tensor of row indices or class targets.
#[allow(clippy::cast_possible_wrap)]
pub fn index_tensor<B: Backend>(indices: &[usize], device: &B::Device) -> Tensor<B, 1, Int> {
    let values: Vec<i64> = indices.iter().map(|&i| i as i64).collect();
    Tensor::from_data(TensorData::new(values, [indices.len()]), device)
}

/// Reads a 2-D float tensor back into row-major values.
pub fn tensor_values<B: Backend>(tensor: Tensor<B, 2>) -> Vec<f32> {
    tensor.into_data().iter::<f32>().collect()
}

/// Row-wise arg-max of a `[n, classes]` tensor.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn argmax_rows<B: Backend>(scores: Tensor<B, 2>) -> Vec<usize> {
    scores
        .argmax(1)
        .into_data()
        .iter::<i64>()
        .map(|i| i as usize)
        .collect()
}
