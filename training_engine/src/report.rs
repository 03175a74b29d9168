//! Result tables.
//!
//! Column layouts follow the tables the analysis scripts downstream read:
//! floats in shortest round-trip notation, booleans as `True`/`False`,
//! missing values as empty cells.

use std::path::Path;

use expression_loader::ExpressionMatrix;
use tracing::info;
use utils_crate::format_float;

use crate::{error::TrainingError, grid::ParameterSet, history::EpochRecord};

/// One row of the resampling performance table.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRow {
    /// Hyperparameters of the fit.
    pub parameters: ParameterSet,
    /// Scores of one epoch of that fit.
    pub epoch: EpochRecord,
}

const PERFORMANCE_HEADER: [&str; 23] = [
    "sample",
    "hidden_units",
    "hidden_layers",
    "dropout",
    "weight_decay",
    "max_epochs",
    "total_steps",
    "learning_rate",
    "optimizer",
    "parameter_set",
    "epoch",
    "train_batch_count",
    "valid_batch_count",
    "dur",
    "train_loss",
    "train_loss_best",
    "valid_loss",
    "valid_loss_best",
    "valid_acc",
    "valid_acc_best",
    "event_lr",
    "train_acc",
    "train_acc_best",
];

fn flag(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}

/// `f32` cells keep their shortest `f32` digits, then follow [`format_float`].
fn format_cell(value: f32) -> String {
    value
        .to_string()
        .parse::<f64>()
        .map_or_else(|_| value.to_string(), format_float)
}

fn optional<T>(value: Option<T>, render: impl Fn(T) -> String) -> String {
    value.map_or_else(String::new, render)
}

fn writer(path: &Path) -> Result<csv::Writer<std::fs::File>, TrainingError> {
    csv::Writer::from_path(path).map_err(|source| report_error(path, source))
}

fn report_error(path: &Path, source: csv::Error) -> TrainingError {
    TrainingError::Report {
        path: path.to_string_lossy().into_owned(),
        source,
    }
}

fn finish(path: &Path, mut wtr: csv::Writer<std::fs::File>, rows: usize) -> Result<(), TrainingError> {
    wtr.flush()
        .map_err(|e| report_error(path, csv::Error::from(e)))?;
    info!("Wrote {} rows to {:?}", rows, path);
    Ok(())
}

/// Writes the per-epoch performance table of a resampling run.
///
/// # Errors
/// `TrainingError::Report` on any I/O or CSV failure.
pub fn write_performance(path: &Path, rows: &[PerformanceRow]) -> Result<(), TrainingError> {
    let mut wtr = writer(path)?;
    wtr.write_record(PERFORMANCE_HEADER)
        .map_err(|e| report_error(path, e))?;
    for row in rows {
        let p = &row.parameters;
        let e = &row.epoch;
        wtr.write_record([
            p.sample.to_string(),
            p.hidden_units.to_string(),
            p.hidden_layers.to_string(),
            format_float(p.dropout),
            format_float(p.weight_decay),
            p.max_epochs.to_string(),
            p.total_steps.to_string(),
            format_float(p.learning_rate),
            p.optimizer.to_string(),
            p.parameter_set.to_string(),
            e.epoch.to_string(),
            e.train_batch_count.to_string(),
            e.valid_batch_count.to_string(),
            format_float(e.dur),
            format_float(e.train_loss),
            flag(e.train_loss_best),
            optional(e.valid_loss, format_float),
            optional(e.valid_loss_best, flag),
            optional(e.valid_acc, format_float),
            optional(e.valid_acc_best, flag),
            format_float(e.event_lr),
            format_float(e.train_acc),
            flag(e.train_acc_best),
        ])
        .map_err(|e| report_error(path, e))?;
    }
    finish(path, wtr, rows.len())
}

/// Writes a confusion matrix: one column per predicted class, then a
/// `label_header` column naming the true class of each row.
///
/// # Errors
/// `DataMismatch` if the matrix is not `classes.len()` square, `Report` on
/// write failure.
pub fn write_confusion_matrix(
    path: &Path,
    matrix: &[Vec<u64>],
    classes: &[String],
    label_header: &str,
) -> Result<(), TrainingError> {
    if matrix.len() != classes.len() || matrix.iter().any(|r| r.len() != classes.len()) {
        return Err(TrainingError::DataMismatch(format!(
            "confusion matrix does not match {} classes",
            classes.len()
        )));
    }
    let mut wtr = writer(path)?;
    wtr.write_record(classes.iter().map(String::as_str).chain([label_header]))
        .map_err(|e| report_error(path, e))?;
    for (row, class) in matrix.iter().zip(classes) {
        wtr.write_record(row.iter().map(ToString::to_string).chain([class.clone()]))
            .map_err(|e| report_error(path, e))?;
    }
    finish(path, wtr, matrix.len())
}

/// Writes a matrix followed by one text column (`label_header`) with a
/// label per row. Used for probabilities, latent transforms and
/// attributions.
///
/// # Errors
/// `DataMismatch` if the label count differs from the row count, `Report`
/// on write failure.
pub fn write_labelled_matrix(
    path: &Path,
    matrix: &ExpressionMatrix,
    label_header: &str,
    labels: &[String],
) -> Result<(), TrainingError> {
    if labels.len() != matrix.n_rows() {
        return Err(TrainingError::DataMismatch(format!(
            "{} labels for {} rows",
            labels.len(),
            matrix.n_rows()
        )));
    }
    let mut wtr = writer(path)?;
    wtr.write_record(matrix.columns().iter().map(String::as_str).chain([label_header]))
        .map_err(|e| report_error(path, e))?;
    for (i, label) in labels.iter().enumerate() {
        wtr.write_record(
            matrix
                .row(i)
                .iter()
                .map(|&v| format_cell(v))
                .chain([label.clone()]),
        )
        .map_err(|e| report_error(path, e))?;
    }
    finish(path, wtr, labels.len())
}
