//! Gene-set operations over column headers.

use std::collections::BTreeSet;

use crate::matrix::normalize_gene_name;

/// Normalised gene names of `columns`.
pub fn gene_set<S: AsRef<str>>(columns: &[S]) -> BTreeSet<String> {
    columns
        .iter()
        .map(|c| normalize_gene_name(c.as_ref()))
        .collect()
}

/// Genes present in every set. Empty input gives an empty set.
#[must_use]
pub fn intersect(sets: &[BTreeSet<String>]) -> BTreeSet<String> {
    let Some((first, rest)) = sets.split_first() else {
        return BTreeSet::new();
    };
    first
        .iter()
        .filter(|gene| rest.iter().all(|s| s.contains(*gene)))
        .cloned()
        .collect()
}

/// Indices of the columns whose normalised name belongs to `genes`,
/// in column order. Replicate columns of one gene are all kept.
pub fn columns_in_set<S: AsRef<str>>(columns: &[S], genes: &BTreeSet<String>) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .filter(|(_, c)| genes.contains(&normalize_gene_name(c.as_ref())))
        .map(|(j, _)| j)
        .collect()
}
