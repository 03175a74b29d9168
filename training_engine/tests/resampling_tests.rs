use expression_loader::ExpressionMatrix;
use training_engine::{build_train_validation_sets, TrainingError};

const ROWS: usize = 4;

/// Column `j` of the coronal assay holds `100 * (j + 1) + i`, column `j` of
/// the sagittal assay `1000 * (j + 1) + i`, so every value names its source.
#[allow(clippy::cast_precision_loss)]
fn assay(names: &[&str], base: f32) -> ExpressionMatrix {
    let data: Vec<Vec<f32>> = (0..names.len())
        .map(|j| (0..ROWS).map(|i| base * (j + 1) as f32 + i as f32).collect())
        .collect();
    ExpressionMatrix::from_columns(names.iter().map(|s| (*s).to_string()).collect(), &data).unwrap()
}

fn coronal() -> ExpressionMatrix {
    assay(&["Gad1", "Pvalb...2", "Pvalb...3", "Sst", "Pvalb...4"], 100.0)
}

fn sagittal() -> ExpressionMatrix {
    assay(&["Sst", "Gad1", "Pvalb"], 1000.0)
}

#[test]
fn test_sets_have_unique_sorted_genes() {
    let sets = build_train_validation_sets(&coronal(), &sagittal(), 1).unwrap();
    assert_eq!(sets.training.columns(), ["Gad1", "Pvalb", "Sst"]);
    assert_eq!(sets.validation.columns(), ["Gad1", "Pvalb", "Sst"]);
    assert_eq!(sets.training.n_rows(), ROWS);
    assert_eq!(sets.summary.replicated, 1);
    assert_eq!(sets.summary.coronal_training + sets.summary.sagittal_training, 2);
}

#[test]
fn test_replicated_gene_uses_two_distinct_coronal_replicates() {
    let coronal_pvalb = [200.0, 300.0, 500.0];
    for seed in 1..=20 {
        let sets = build_train_validation_sets(&coronal(), &sagittal(), seed).unwrap();
        let train = sets.training.value(0, 1);
        let valid = sets.validation.value(0, 1);
        assert!(coronal_pvalb.contains(&train), "seed {seed}: {train}");
        assert!(coronal_pvalb.contains(&valid), "seed {seed}: {valid}");
        assert!((train - valid).abs() > 0.5, "seed {seed}: same replicate twice");
    }
}

#[test]
fn test_single_gene_splits_across_assays() {
    for seed in 1..=20 {
        let sets = build_train_validation_sets(&coronal(), &sagittal(), seed).unwrap();
        for j in [0, 2] {
            let train = sets.training.value(2, j);
            let valid = sets.validation.value(2, j);
            let from_sagittal = |v: f32| v >= 1000.0;
            assert_ne!(from_sagittal(train), from_sagittal(valid), "seed {seed}, gene {j}");
        }
    }
}

#[test]
fn test_rows_stay_aligned() {
    let sets = build_train_validation_sets(&coronal(), &sagittal(), 3).unwrap();
    for i in 0..ROWS {
        for j in 0..3 {
            #[allow(clippy::cast_precision_loss)]
            let offset = i as f32;
            assert_eq!(sets.training.value(i, j) % 100.0, offset);
            assert_eq!(sets.validation.value(i, j) % 100.0, offset);
        }
    }
}

#[test]
fn test_same_seed_same_draw() {
    let a = build_train_validation_sets(&coronal(), &sagittal(), 42).unwrap();
    let b = build_train_validation_sets(&coronal(), &sagittal(), 42).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_seeds_vary_the_draw() {
    let draws: Vec<_> = (1..=10)
        .map(|seed| build_train_validation_sets(&coronal(), &sagittal(), seed).unwrap().training)
        .collect();
    assert!(draws.iter().any(|d| *d != draws[0]));
}

#[test]
fn test_missing_sagittal_gene_is_error() {
    let sagittal = assay(&["Gad1", "Pvalb"], 1000.0);
    match build_train_validation_sets(&coronal(), &sagittal, 1) {
        Err(TrainingError::DataMismatch(msg)) => assert!(msg.contains("Sst")),
        other => panic!("Expected DataMismatch, got {other:?}"),
    }
}

#[test]
fn test_row_count_mismatch_is_error() {
    let short = ExpressionMatrix::from_columns(
        vec!["Sst".into(), "Gad1".into(), "Pvalb".into()],
        &[vec![1.0], vec![2.0], vec![3.0]],
    )
    .unwrap();
    assert!(matches!(
        build_train_validation_sets(&coronal(), &short, 1),
        Err(TrainingError::DataMismatch(_))
    ));
}
