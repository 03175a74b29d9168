//! Per-split preprocessing of resampled expression matrices.
//!
//! Each voxel is standardised across genes, then each gene is centred
//! across voxels. Training and validation matrices are processed
//! independently, so no statistics leak between them.

use expression_loader::ExpressionMatrix;

/// Scales below this are treated as zero variance and left unscaled.
const ZERO_SCALE: f64 = 10.0 * f64::EPSILON;

/// Standardises every row to zero mean and unit (population) standard
/// deviation. Constant rows are only centred.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn standardize_rows(matrix: &mut ExpressionMatrix) {
    let width = matrix.n_cols();
    if width == 0 {
        return;
    }
    for row in matrix.values_mut().chunks_mut(width) {
        let mean = row.iter().map(|&v| f64::from(v)).sum::<f64>() / width as f64;
        let var = row
            .iter()
            .map(|&v| (f64::from(v) - mean).powi(2))
            .sum::<f64>()
            / width as f64;
        let scale = if var.sqrt() < ZERO_SCALE { 1.0 } else { var.sqrt() };
        for v in row.iter_mut() {
            *v = ((f64::from(*v) - mean) / scale) as f32;
        }
    }
}

/// Subtracts the column mean from every column.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn center_columns(matrix: &mut ExpressionMatrix) {
    let width = matrix.n_cols();
    let n_rows = matrix.n_rows();
    if width == 0 || n_rows == 0 {
        return;
    }
    let mut sums = vec![0.0f64; width];
    for row in matrix.values().chunks(width) {
        for (s, &v) in sums.iter_mut().zip(row) {
            *s += f64::from(v);
        }
    }
    let means: Vec<f64> = sums.into_iter().map(|s| s / n_rows as f64).collect();
    for row in matrix.values_mut().chunks_mut(width) {
        for (v, m) in row.iter_mut().zip(&means) {
            *v = (f64::from(*v) - m) as f32;
        }
    }
}

/// Row standardisation followed by column centring.
#[must_use]
pub fn scale_then_center(mut matrix: ExpressionMatrix) -> ExpressionMatrix {
    standardize_rows(&mut matrix);
    center_columns(&mut matrix);
    matrix
}
