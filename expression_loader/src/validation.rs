use crate::{error::LoaderError, matrix::LabelledExpression};
use tracing::{debug, warn};

/// Number of bad cells listed individually before summarising.
const MAX_REPORTED_CELLS: usize = 5;

/// Content checks for loaded matrices, kept apart from parsing.
pub struct MatrixValidator;

impl MatrixValidator {
    /// Checks that every expression value is finite and that every label
    /// column has one value per row. All problems are collected and
    /// reported together.
    ///
    /// # Errors
    /// `LoaderError::InvalidData` listing every problem found.
    pub fn validate(expression: &LabelledExpression, source_name: &str) -> Result<(), LoaderError> {
        debug!("Validating expression matrix from {}", source_name);
        let mut problems: Vec<String> = Vec::new();

        let inputs = &expression.inputs;
        let width = inputs.n_cols();
        let bad_cells: Vec<usize> = inputs
            .values()
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_finite())
            .map(|(k, _)| k)
            .collect();
        for &k in bad_cells.iter().take(MAX_REPORTED_CELLS) {
            problems.push(format!(
                "non-finite value at row {}, column '{}'",
                k / width + 1,
                inputs.columns()[k % width]
            ));
        }
        if bad_cells.len() > MAX_REPORTED_CELLS {
            problems.push(format!(
                "{} more non-finite values",
                bad_cells.len() - MAX_REPORTED_CELLS
            ));
        }

        for label in &expression.labels {
            if label.values.len() != inputs.n_rows() {
                problems.push(format!(
                    "label column '{}' has {} values for {} rows",
                    label.name,
                    label.values.len(),
                    inputs.n_rows()
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            warn!("{} validation problem(s) in {}", problems.len(), source_name);
            Err(LoaderError::InvalidData {
                source_name: source_name.to_string(),
                problems,
            })
        }
    }

    /// Checks that two assays describe the same voxels.
    ///
    /// # Errors
    /// `LoaderError::Shape` if the row counts differ.
    pub fn ensure_same_rows(
        left_name: &str,
        left: &LabelledExpression,
        right_name: &str,
        right: &LabelledExpression,
    ) -> Result<(), LoaderError> {
        if left.n_rows() == right.n_rows() {
            Ok(())
        } else {
            Err(LoaderError::Shape {
                message: format!(
                    "{left_name} has {} rows but {right_name} has {}",
                    left.n_rows(),
                    right.n_rows()
                ),
            })
        }
    }
}
