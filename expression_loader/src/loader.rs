use std::fs::File;
use std::path::Path;

use tracing::{debug, info};

use crate::{
    error::LoaderError,
    matrix::{is_label_column, ExpressionMatrix, LabelColumn, LabelledExpression},
    validation::MatrixValidator,
};

/// Reads labelled expression matrices from CSV exports.
///
/// The first line is the header. Columns whose header starts with `Region`
/// are kept as text labels; every other column must be numeric. An unnamed
/// first column is taken as a row index and skipped. `NA`, `NaN` and empty
/// cells read as NaN and are then rejected by validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionLoader;

enum ColumnRole {
    Index,
    Label(usize),
    Value,
}

impl ExpressionLoader {
    /// Loads and validates a labelled expression CSV.
    ///
    /// # Errors
    /// `Io` if the file cannot be opened, `Csv` for malformed CSV, `Parse`
    /// for a non-numeric expression cell, `Empty` when there are no rows or no
    /// expression columns, `InvalidData` when validation fails.
    pub fn load(path: &Path) -> Result<LabelledExpression, LoaderError> {
        let path_str = path.to_string_lossy().into_owned();
        info!("Loading expression matrix from {:?}", path);

        let mut reader = Self::open(path, &path_str)?;
        let headers = reader
            .headers()
            .map_err(|e| LoaderError::csv(&path_str, e))?
            .clone();

        let mut labels: Vec<LabelColumn> = Vec::new();
        let mut gene_columns: Vec<String> = Vec::new();
        let roles: Vec<ColumnRole> = headers
            .iter()
            .enumerate()
            .map(|(j, h)| {
                if j == 0 && h.trim().is_empty() {
                    ColumnRole::Index
                } else if is_label_column(h) {
                    labels.push(LabelColumn {
                        name: h.to_string(),
                        values: Vec::new(),
                    });
                    ColumnRole::Label(labels.len() - 1)
                } else {
                    gene_columns.push(h.to_string());
                    ColumnRole::Value
                }
            })
            .collect();

        if gene_columns.is_empty() {
            return Err(LoaderError::Empty { path: path_str });
        }

        let mut values: Vec<f32> = Vec::new();
        let mut n_rows = 0usize;
        for record in reader.records() {
            let record = record.map_err(|e| LoaderError::csv(&path_str, e))?;
            let line = record.position().map_or(0, csv::Position::line);
            for ((cell, role), header) in record.iter().zip(&roles).zip(headers.iter()) {
                match role {
                    ColumnRole::Index => {}
                    ColumnRole::Label(k) => labels[*k].values.push(cell.to_string()),
                    ColumnRole::Value => values.push(parse_cell(cell).ok_or_else(|| {
                        LoaderError::Parse {
                            path: path_str.clone(),
                            line,
                            column: header.to_string(),
                            value: cell.to_string(),
                        }
                    })?),
                }
            }
            n_rows += 1;
        }

        if n_rows == 0 {
            return Err(LoaderError::Empty { path: path_str });
        }

        let expression = LabelledExpression {
            inputs: ExpressionMatrix::new(gene_columns, n_rows, values)?,
            labels,
        };
        MatrixValidator::validate(&expression, &path_str)?;

        info!(
            "Loaded {:?}: {} rows, {} expression columns, {} label columns",
            path.file_name().unwrap_or_default(),
            expression.n_rows(),
            expression.inputs.n_cols(),
            expression.labels.len()
        );
        Ok(expression)
    }

    /// Reads only the header row of a CSV.
    ///
    /// # Errors
    /// `Io` if the file cannot be opened, `Csv` if the header is malformed.
    pub fn read_header(path: &Path) -> Result<Vec<String>, LoaderError> {
        let path_str = path.to_string_lossy().into_owned();
        let mut reader = Self::open(path, &path_str)?;
        let headers = reader
            .headers()
            .map_err(|e| LoaderError::csv(&path_str, e))?;
        debug!("Read {} header fields from {:?}", headers.len(), path);
        Ok(headers.iter().map(str::to_string).collect())
    }

    fn open(path: &Path, path_str: &str) -> Result<csv::Reader<File>, LoaderError> {
        let file = File::open(path).map_err(|source| LoaderError::Io {
            path: path_str.to_string(),
            source,
        })?;
        Ok(csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file))
    }
}

fn parse_cell(cell: &str) -> Option<f32> {
    match cell {
        "" | "NA" | "NaN" | "nan" => Some(f32::NAN),
        _ => cell.parse::<f32>().ok(),
    }
}
