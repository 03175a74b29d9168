use approx::assert_relative_eq;
use expression_loader::ExpressionMatrix;
use training_engine::preprocess::{center_columns, scale_then_center, standardize_rows};

fn matrix(rows: &[[f32; 3]]) -> ExpressionMatrix {
    ExpressionMatrix::new(
        vec!["A".into(), "B".into(), "C".into()],
        rows.len(),
        rows.iter().flatten().copied().collect(),
    )
    .unwrap()
}

#[test]
fn test_standardize_rows_population_std() {
    let mut m = matrix(&[[1.0, 2.0, 3.0], [10.0, 10.0, 40.0]]);
    standardize_rows(&mut m);
    let sd = (2.0f32 / 3.0).sqrt();
    assert_relative_eq!(m.value(0, 0), -1.0 / sd, epsilon = 1e-5);
    assert_relative_eq!(m.value(0, 1), 0.0, epsilon = 1e-6);
    assert_relative_eq!(m.value(0, 2), 1.0 / sd, epsilon = 1e-5);
    for i in 0..2 {
        let row = m.row(i);
        let mean: f32 = row.iter().sum::<f32>() / 3.0;
        let var: f32 = row.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / 3.0;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-6);
        assert_relative_eq!(var, 1.0, epsilon = 1e-5);
    }
}

#[test]
fn test_constant_row_is_only_centred() {
    let mut m = matrix(&[[5.0, 5.0, 5.0]]);
    standardize_rows(&mut m);
    assert_eq!(m.values(), [0.0, 0.0, 0.0]);
}

#[test]
fn test_center_columns() {
    let mut m = matrix(&[[1.0, 0.0, 4.0], [3.0, 0.0, -4.0]]);
    center_columns(&mut m);
    assert_eq!(m.values(), [-1.0, 0.0, 4.0, 1.0, 0.0, -4.0]);
}

#[test]
fn test_scale_then_center_zero_column_means() {
    let m = scale_then_center(matrix(&[[1.0, 2.0, 4.0], [0.5, -3.0, 2.0], [7.0, 7.5, 8.0]]));
    for j in 0..3 {
        let mean: f32 = m.column(j).iter().sum::<f32>() / 3.0;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-6);
    }
}
