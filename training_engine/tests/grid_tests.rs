use training_engine::{HyperparameterGrid, OptimizerKind, TrainingError};

fn grid() -> HyperparameterGrid {
    HyperparameterGrid {
        samples: vec![1, 2],
        hidden_units: vec![100, 500],
        hidden_layers: vec![3],
        dropout: vec![0.0],
        weight_decay: vec![0.0, 1e-6],
        max_epochs: vec![200],
        total_steps: None,
        learning_rate: vec![1e-5],
        optimizer: vec![OptimizerKind::Sgd],
    }
}

#[test]
fn test_expand_orders_and_numbers_per_sample() {
    let sets = grid().expand().unwrap();
    assert_eq!(sets.len(), 8);

    let first: Vec<(u64, usize, f64, usize)> = sets[..4]
        .iter()
        .map(|p| (p.sample, p.hidden_units, p.weight_decay, p.parameter_set))
        .collect();
    assert_eq!(
        first,
        [(1, 100, 0.0, 1), (1, 100, 1e-6, 2), (1, 500, 0.0, 3), (1, 500, 1e-6, 4)]
    );
    assert_eq!(sets[4].sample, 2);
    assert_eq!(sets[4].parameter_set, 1);
    assert_eq!(sets[7].parameter_set, 4);
}

#[test]
fn test_expand_ties_steps_to_epochs_when_unset() {
    let mut g = grid();
    g.samples = vec![1];
    g.max_epochs = vec![10, 40];
    let sets = g.expand().unwrap();
    assert_eq!(sets.len(), g.len());
    assert!(sets.iter().all(|p| p.total_steps == p.max_epochs));
}

#[test]
fn test_expand_crosses_explicit_steps() {
    let mut g = grid();
    g.samples = vec![1];
    g.hidden_units = vec![500];
    g.weight_decay = vec![0.0];
    g.total_steps = Some(vec![200, 400]);
    g.optimizer = vec![OptimizerKind::Sgd, OptimizerKind::AdamW];
    let sets = g.expand().unwrap();
    let combos: Vec<(usize, OptimizerKind)> = sets.iter().map(|p| (p.total_steps, p.optimizer)).collect();
    assert_eq!(
        combos,
        [
            (200, OptimizerKind::Sgd),
            (200, OptimizerKind::AdamW),
            (400, OptimizerKind::Sgd),
            (400, OptimizerKind::AdamW),
        ]
    );
}

#[test]
fn test_expand_rejects_empty_lists() {
    let mut g = grid();
    g.dropout.clear();
    g.optimizer.clear();
    assert!(g.is_empty());
    match g.expand() {
        Err(TrainingError::InvalidConfig(msg)) => {
            assert!(msg.contains("dropout"));
            assert!(msg.contains("optimizer"));
        }
        other => panic!("Expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn test_trainer_config_from_parameter_set() {
    let set = grid().expand().unwrap().remove(1);
    let config = set.trainer_config(64, Some(7));
    assert_eq!(config.hidden_units, 100);
    assert_eq!(config.total_steps, Some(200));
    assert_eq!(config.batch_size, 64);
    assert_eq!(config.seed, Some(7));
    assert!(config.validate().is_ok());
}
