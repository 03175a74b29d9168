use thiserror::Error;
use utils_crate::UtilsError;

/// Errors raised while reading or checking expression matrices.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// File system failure.
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// File that caused the error.
        path: String,
        /// Underlying `std::io::Error`.
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV (ragged rows, bad quoting, invalid UTF-8).
    #[error("Failed to read CSV '{path}': {source}")]
    Csv {
        /// File that caused the error.
        path: String,
        /// Underlying `csv::Error`.
        #[source]
        source: csv::Error,
    },

    /// A cell of an expression column is not a number.
    #[error("'{path}' line {line}, column '{column}': cannot parse '{value}' as a number")]
    Parse {
        /// File being parsed.
        path: String,
        /// 1-based line in the file.
        line: u64,
        /// Column header.
        column: String,
        /// Offending cell content.
        value: String,
    },

    /// The file has a header but no rows, or no expression columns.
    #[error("'{path}' contains no expression data")]
    Empty {
        /// File that was empty.
        path: String,
    },

    /// A required column (label or gene) is not present.
    #[error("Column '{column}' not found in {context}")]
    MissingColumn {
        /// Requested column name.
        column: String,
        /// Where it was looked up.
        context: String,
    },

    /// Dimensions do not agree.
    #[error("Shape mismatch: {message}")]
    Shape {
        /// What disagreed.
        message: String,
    },

    /// Content checks failed.
    #[error("Invalid data in {source_name}: {}", problems.join("; "))]
    InvalidData {
        /// Matrix or file the problems were found in.
        source_name: String,
        /// Every problem found.
        problems: Vec<String>,
    },

    /// Failure in a shared utility (missing data file, ...).
    #[error(transparent)]
    Utils(#[from] UtilsError),
}

impl LoaderError {
    pub(crate) fn csv(path: &str, source: csv::Error) -> Self {
        Self::Csv {
            path: path.to_string(),
            source,
        }
    }
}
