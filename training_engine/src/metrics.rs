//! Classification metrics.

use crate::error::TrainingError;

/// Fraction of predictions equal to the truth. Zero for empty input.
///
/// # Errors
/// `TrainingError::DataMismatch` if the slices differ in length.
#[allow(clippy::cast_precision_loss)]
pub fn accuracy(truth: &[usize], predicted: &[usize]) -> Result<f64, TrainingError> {
    check_lengths(truth, predicted)?;
    if truth.is_empty() {
        return Ok(0.0);
    }
    let correct = truth.iter().zip(predicted).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / truth.len() as f64)
}

/// Confusion matrix with rows indexed by true class and columns by
/// predicted class.
///
/// # Errors
/// `TrainingError::DataMismatch` for slices of different length or a class
/// index `>= n_classes`.
pub fn confusion_matrix(
    truth: &[usize],
    predicted: &[usize],
    n_classes: usize,
) -> Result<Vec<Vec<u64>>, TrainingError> {
    check_lengths(truth, predicted)?;
    let mut matrix = vec![vec![0u64; n_classes]; n_classes];
    for (&t, &p) in truth.iter().zip(predicted) {
        if t >= n_classes || p >= n_classes {
            return Err(TrainingError::DataMismatch(format!(
                "class index out of range: truth {t}, predicted {p}, {n_classes} classes"
            )));
        }
        matrix[t][p] += 1;
    }
    Ok(matrix)
}

fn check_lengths(truth: &[usize], predicted: &[usize]) -> Result<(), TrainingError> {
    if truth.len() == predicted.len() {
        Ok(())
    } else {
        Err(TrainingError::DataMismatch(format!(
            "{} true labels but {} predictions",
            truth.len(),
            predicted.len()
        )))
    }
}
