//! Region labels to class indices.

use std::collections::BTreeSet;

use crate::error::TrainingError;

/// Maps label strings to class indices. Classes are the distinct labels in
/// sorted order, so index `k` always names the `k`-th label alphabetically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Learns the classes present in `labels`.
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let classes: BTreeSet<&str> = labels.iter().map(AsRef::as_ref).collect();
        Self {
            classes: classes.into_iter().map(str::to_string).collect(),
        }
    }

    /// Class names in index order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Index of the class called `label`.
    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(label)).ok()
    }

    /// Class indices for `labels`.
    ///
    /// # Errors
    /// `TrainingError::UnknownLabel` for a label never seen by `fit`.
    pub fn encode<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>, TrainingError> {
        labels
            .iter()
            .map(|l| {
                self.index_of(l.as_ref())
                    .ok_or_else(|| TrainingError::UnknownLabel(l.as_ref().to_string()))
            })
            .collect()
    }

    /// Class name for an index.
    #[must_use]
    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }
}
