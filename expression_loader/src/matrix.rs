//! In-memory expression matrices.

use crate::error::LoaderError;

/// Dense row-major `f32` matrix with named columns.
///
/// Rows are voxels, regions or tissue samples; columns are genes, or latent
/// features for transformed data.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionMatrix {
    columns: Vec<String>,
    n_rows: usize,
    values: Vec<f32>,
}

impl ExpressionMatrix {
    /// Builds a matrix from row-major values.
    ///
    /// # Errors
    /// `LoaderError::Shape` when `values.len() != n_rows * columns.len()`.
    pub fn new(columns: Vec<String>, n_rows: usize, values: Vec<f32>) -> Result<Self, LoaderError> {
        if values.len() != n_rows * columns.len() {
            return Err(LoaderError::Shape {
                message: format!(
                    "{} values for {} rows x {} columns",
                    values.len(),
                    n_rows,
                    columns.len()
                ),
            });
        }
        Ok(Self {
            columns,
            n_rows,
            values,
        })
    }

    /// Builds a matrix from column vectors of equal length.
    ///
    /// # Errors
    /// `LoaderError::Shape` when the names and columns disagree in count or
    /// the columns differ in length.
    pub fn from_columns(columns: Vec<String>, data: &[Vec<f32>]) -> Result<Self, LoaderError> {
        if columns.len() != data.len() {
            return Err(LoaderError::Shape {
                message: format!("{} names for {} columns", columns.len(), data.len()),
            });
        }
        let n_rows = data.first().map_or(0, Vec::len);
        if let Some(bad) = data.iter().position(|c| c.len() != n_rows) {
            return Err(LoaderError::Shape {
                message: format!(
                    "column '{}' has {} rows, expected {}",
                    columns[bad],
                    data[bad].len(),
                    n_rows
                ),
            });
        }
        let mut values = Vec::with_capacity(n_rows * data.len());
        for i in 0..n_rows {
            values.extend(data.iter().map(|c| c[i]));
        }
        Self::new(columns, n_rows, values)
    }

    /// Number of rows.
    #[must_use]
    pub const fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row-major values.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Mutable row-major values, for in-place preprocessing.
    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// Row `i` as a slice.
    ///
    /// # Panics
    /// If `i >= n_rows()`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f32] {
        let width = self.n_cols();
        &self.values[i * width..(i + 1) * width]
    }

    /// Owned copy of column `j`.
    ///
    /// # Panics
    /// If `j >= n_cols()`.
    #[must_use]
    pub fn column(&self, j: usize) -> Vec<f32> {
        let width = self.n_cols();
        (0..self.n_rows).map(|i| self.values[i * width + j]).collect()
    }

    /// Single cell.
    ///
    /// # Panics
    /// If the indices are out of range.
    #[must_use]
    pub fn value(&self, i: usize, j: usize) -> f32 {
        self.values[i * self.n_cols() + j]
    }

    /// Index of the column called `name`.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// New matrix with the given columns, in the given order.
    ///
    /// # Panics
    /// If an index is out of range.
    #[must_use]
    pub fn select_columns(&self, indices: &[usize]) -> Self {
        let width = self.n_cols();
        let mut values = Vec::with_capacity(self.n_rows * indices.len());
        for i in 0..self.n_rows {
            let row = &self.values[i * width..(i + 1) * width];
            values.extend(indices.iter().map(|&j| row[j]));
        }
        Self {
            columns: indices.iter().map(|&j| self.columns[j].clone()).collect(),
            n_rows: self.n_rows,
            values,
        }
    }

    /// New matrix with the named columns, in the order of `names`.
    ///
    /// # Errors
    /// `LoaderError::MissingColumn` for the first name not present.
    pub fn select_by_names(&self, names: &[String]) -> Result<Self, LoaderError> {
        let indices = names
            .iter()
            .map(|name| {
                self.column_index(name).ok_or_else(|| LoaderError::MissingColumn {
                    column: name.clone(),
                    context: format!("matrix with {} columns", self.n_cols()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.select_columns(&indices))
    }

    /// Appends the rows of `other` below the rows of `self`.
    ///
    /// # Errors
    /// `LoaderError::Shape` if the column names differ.
    pub fn vstack(&self, other: &Self) -> Result<Self, LoaderError> {
        if self.columns != other.columns {
            return Err(LoaderError::Shape {
                message: format!(
                    "cannot stack matrices with {} and {} differing columns",
                    self.n_cols(),
                    other.n_cols()
                ),
            });
        }
        let mut values = Vec::with_capacity(self.values.len() + other.values.len());
        values.extend_from_slice(&self.values);
        values.extend_from_slice(&other.values);
        Ok(Self {
            columns: self.columns.clone(),
            n_rows: self.n_rows + other.n_rows,
            values,
        })
    }
}

/// A non-numeric `Region*` column of an expression file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelColumn {
    /// Header, e.g. `Region67`.
    pub name: String,
    /// One label per row.
    pub values: Vec<String>,
}

/// Expression values plus the region labels stored alongside them.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledExpression {
    /// Numeric columns.
    pub inputs: ExpressionMatrix,
    /// Label columns, in file order.
    pub labels: Vec<LabelColumn>,
}

impl LabelledExpression {
    /// Number of rows.
    #[must_use]
    pub const fn n_rows(&self) -> usize {
        self.inputs.n_rows()
    }

    /// Values of the label column `name`.
    ///
    /// # Errors
    /// `LoaderError::MissingColumn` if there is no such label column.
    pub fn label_column(&self, name: &str) -> Result<&[String], LoaderError> {
        self.labels
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| LoaderError::MissingColumn {
                column: name.to_string(),
                context: format!(
                    "label columns [{}]",
                    self.labels
                        .iter()
                        .map(|c| c.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })
    }
}

/// Whether a header names a label column rather than a gene.
#[must_use]
pub fn is_label_column(header: &str) -> bool {
    header.starts_with("Region")
}

/// Strips the `...<digits>` markers R appends to duplicated column names,
/// so `Gad1...123` becomes `Gad1`.
#[must_use]
pub fn normalize_gene_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(pos) = rest.find("...") {
        let after = &rest[pos + 3..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 {
            out.push_str(&rest[..pos]);
            rest = &after[digits..];
        } else {
            out.push_str(&rest[..=pos]);
            rest = &rest[pos + 1..];
        }
    }
    out.push_str(rest);
    out
}
