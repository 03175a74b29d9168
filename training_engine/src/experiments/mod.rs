//! End-to-end experiment pipelines, one per command-line tool.
//!
//! - [`validation`]: coronal/sagittal resampling over a hyperparameter grid.
//! - [`training`]: one classifier on all voxels, applied to mouse and human
//!   regional data.

pub mod training;
pub mod validation;

use std::path::Path;

use expression_loader::{files, ExpressionLoader, LabelledExpression, MatrixValidator};
use utils_crate::format_float;

use crate::error::TrainingError;

/// Loads `file_name` from `data_dir`.
fn load_data_file(data_dir: &Path, file_name: &str) -> Result<LabelledExpression, TrainingError> {
    let path = files::locate(data_dir, file_name)?;
    Ok(ExpressionLoader::load(&path)?)
}

/// Common stem of the train-mlp outputs: `{Labels}_Layers{L}_Units{U}_L2{W}`.
fn model_stem(labels: &str, hidden_layers: usize, hidden_units: usize, weight_decay: f64) -> String {
    format!(
        "{labels}_Layers{hidden_layers}_Units{hidden_units}_L2{}",
        format_float(weight_decay)
    )
}

fn check_same_voxels(
    left_name: &str,
    left: &LabelledExpression,
    right_name: &str,
    right: &LabelledExpression,
) -> Result<(), TrainingError> {
    Ok(MatrixValidator::ensure_same_rows(left_name, left, right_name, right)?)
}
