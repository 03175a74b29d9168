//! Gene-level train/validation resampling across the coronal and sagittal
//! assays.
//!
//! Both assays cover the same voxels. For every gene, one measurement goes
//! to the training matrix and a different one to the validation matrix:
//! two distinct coronal replicates when the coronal assay has several,
//! otherwise the coronal and sagittal measurements in random order.

use std::collections::BTreeMap;

use expression_loader::{normalize_gene_name, ExpressionMatrix};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::TrainingError;

/// Which assay a column is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assay {
    Coronal,
    Sagittal,
}

/// Per-gene source counts of one resample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResamplingSummary {
    /// Genes split between two coronal replicates.
    pub replicated: usize,
    /// Single-replicate genes trained on the coronal assay.
    pub coronal_training: usize,
    /// Single-replicate genes trained on the sagittal assay.
    pub sagittal_training: usize,
}

/// Paired matrices of one resample. Columns are the unique genes in sorted
/// order; rows are the voxels of the input assays.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainValidationSets {
    /// Training expression.
    pub training: ExpressionMatrix,
    /// Validation expression.
    pub validation: ExpressionMatrix,
    /// How the genes were assigned.
    pub summary: ResamplingSummary,
}

/// Builds one training/validation pair.
///
/// `coronal` may contain several replicate columns per gene
/// (`Gene...12`-style names); `sagittal` must contain every coronal gene.
/// The draw is fully determined by `seed`.
///
/// # Errors
/// `DataMismatch` if the assays have different row counts or a coronal gene
/// has no single-replicate counterpart in the sagittal assay.
pub fn build_train_validation_sets(
    coronal: &ExpressionMatrix,
    sagittal: &ExpressionMatrix,
    seed: u64,
) -> Result<TrainValidationSets, TrainingError> {
    if coronal.n_rows() != sagittal.n_rows() {
        return Err(TrainingError::DataMismatch(format!(
            "coronal assay has {} voxels, sagittal assay has {}",
            coronal.n_rows(),
            sagittal.n_rows()
        )));
    }

    let mut replicates: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (j, name) in coronal.columns().iter().enumerate() {
        replicates.entry(normalize_gene_name(name)).or_default().push(j);
    }
    let mut sagittal_columns: BTreeMap<String, usize> = BTreeMap::new();
    for (j, name) in sagittal.columns().iter().enumerate() {
        sagittal_columns.entry(normalize_gene_name(name)).or_insert(j);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut summary = ResamplingSummary::default();
    let mut training_sources: Vec<(Assay, usize)> = Vec::with_capacity(replicates.len());
    let mut validation_sources: Vec<(Assay, usize)> = Vec::with_capacity(replicates.len());

    for (gene, columns) in &replicates {
        if columns.len() > 1 {
            let train_pick = rng.random_range(0..columns.len());
            // Uniform over the remaining replicates.
            let mut valid_pick = rng.random_range(0..columns.len() - 1);
            if valid_pick >= train_pick {
                valid_pick += 1;
            }
            training_sources.push((Assay::Coronal, columns[train_pick]));
            validation_sources.push((Assay::Coronal, columns[valid_pick]));
            summary.replicated += 1;
        } else {
            let sagittal_col = *sagittal_columns.get(gene).ok_or_else(|| {
                TrainingError::DataMismatch(format!("gene '{gene}' missing from the sagittal assay"))
            })?;
            let coronal_col = columns[0];
            if rng.random_range(0..2u8) == 0 {
                training_sources.push((Assay::Coronal, coronal_col));
                validation_sources.push((Assay::Sagittal, sagittal_col));
                summary.coronal_training += 1;
            } else {
                training_sources.push((Assay::Sagittal, sagittal_col));
                validation_sources.push((Assay::Coronal, coronal_col));
                summary.sagittal_training += 1;
            }
        }
    }

    debug!(
        "Resample seed {}: {} replicated genes, {} coronal->training, {} sagittal->training",
        seed, summary.replicated, summary.coronal_training, summary.sagittal_training
    );

    let genes: Vec<String> = replicates.into_keys().collect();
    Ok(TrainValidationSets {
        training: gather(coronal, sagittal, &training_sources, genes.clone())?,
        validation: gather(coronal, sagittal, &validation_sources, genes)?,
        summary,
    })
}

fn gather(
    coronal: &ExpressionMatrix,
    sagittal: &ExpressionMatrix,
    sources: &[(Assay, usize)],
    genes: Vec<String>,
) -> Result<ExpressionMatrix, TrainingError> {
    let n_rows = coronal.n_rows();
    let mut values = Vec::with_capacity(n_rows * sources.len());
    for i in 0..n_rows {
        let coronal_row = coronal.row(i);
        let sagittal_row = sagittal.row(i);
        values.extend(sources.iter().map(|&(assay, j)| match assay {
            Assay::Coronal => coronal_row[j],
            Assay::Sagittal => sagittal_row[j],
        }));
    }
    Ok(ExpressionMatrix::new(genes, n_rows, values)?)
}
