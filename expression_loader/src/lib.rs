#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! # `expression_loader`
//!
//! Reads the labelled gene-expression matrices the experiments consume:
//! voxel-wise mouse assays (coronal and sagittal), regional mouse and human
//! summaries and human tissue samples.
//!
//! - `matrix`: `ExpressionMatrix`, `LabelledExpression`, gene-name normalisation.
//! - `genes`: gene-set intersection and column filtering.
//! - `loader`: CSV ingestion.
//! - `validation`: content checks.
//! - `files`: data-file names.
//! - `error`: `LoaderError`.

pub mod error;
pub mod files;
pub mod genes;
pub mod loader;
pub mod matrix;
pub mod validation;

pub use error::LoaderError;
pub use loader::ExpressionLoader;
pub use matrix::{
    is_label_column, normalize_gene_name, ExpressionMatrix, LabelColumn, LabelledExpression,
};
pub use validation::MatrixValidator;
