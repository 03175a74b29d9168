//! Names of the expression files inside a data directory.

use std::path::{Path, PathBuf};

use utils_crate::{capitalize_label_set, require_file};

use crate::error::LoaderError;

/// Coronal assay, coronal mask: the reference gene universe for resampling.
pub const CORONAL_REFERENCE: &str =
    "MouseExpressionMatrix_voxel_coronal_maskcoronal_log2_grouped_imputed_labelled.csv";
/// Sagittal assay, sagittal mask.
pub const SAGITTAL: &str =
    "MouseExpressionMatrix_voxel_sagittal_masksagittal_log2_grouped_imputed_labelled.csv";
/// Coronal assay restricted to the sagittal mask, replicate columns kept.
pub const CORONAL_SAGITTAL_MASK: &str =
    "MouseExpressionMatrix_voxel_coronal_masksagittal_log2_imputed_labelled.csv";
/// Scaled coronal voxels used to train the classifier.
pub const TRAINING_VOXELS: &str =
    "MouseExpressionMatrix_voxel_coronal_maskcoronal_log2_grouped_imputed_labelled_scaled.csv";
/// Scaled human tissue samples.
pub const HUMAN_SAMPLES: &str =
    "HumanExpressionMatrix_samples_pipeline_abagen_labelled_scaled.csv";

/// Mouse regional matrix for a label set, e.g. `MouseExpressionMatrix_ROI_Region134_scaled.csv`.
#[must_use]
pub fn mouse_roi(label_set: &str) -> String {
    format!(
        "MouseExpressionMatrix_ROI_{}_scaled.csv",
        capitalize_label_set(label_set)
    )
}

/// Human regional matrix for a label set.
#[must_use]
pub fn human_roi(label_set: &str) -> String {
    format!(
        "HumanExpressionMatrix_ROI_{}_scaled.csv",
        capitalize_label_set(label_set)
    )
}

/// Full path of `file_name` in `data_dir`, checked to exist.
///
/// # Errors
/// `LoaderError::Utils` naming the missing path.
pub fn locate(data_dir: &Path, file_name: &str) -> Result<PathBuf, LoaderError> {
    Ok(require_file(data_dir, file_name)?)
}
