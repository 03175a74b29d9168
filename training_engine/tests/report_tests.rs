use std::fs;

use expression_loader::ExpressionMatrix;
use tempfile::tempdir;
use training_engine::{
    report::{write_confusion_matrix, write_labelled_matrix, write_performance, PerformanceRow},
    EpochRecord, OptimizerKind, ParameterSet, TrainingError,
};

fn row(epoch: usize, validated: bool) -> PerformanceRow {
    PerformanceRow {
        parameters: ParameterSet {
            sample: 1,
            hidden_units: 500,
            hidden_layers: 4,
            dropout: 0.0,
            weight_decay: 1e-6,
            max_epochs: 2,
            total_steps: 2,
            learning_rate: 1e-5,
            optimizer: OptimizerKind::Sgd,
            parameter_set: 3,
        },
        epoch: EpochRecord {
            epoch,
            train_batch_count: 10,
            valid_batch_count: if validated { 10 } else { 0 },
            dur: 0.5,
            event_lr: 4e-7,
            train_loss: 1.25,
            train_loss_best: true,
            valid_loss: validated.then_some(1.5),
            valid_loss_best: validated.then_some(false),
            valid_acc: validated.then_some(0.25),
            valid_acc_best: validated.then_some(true),
            train_acc: 0.75,
            train_acc_best: false,
        },
    }
}

#[test]
fn test_performance_table_layout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("performance.csv");
    write_performance(&path, &[row(1, true), row(2, false)]).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "sample,hidden_units,hidden_layers,dropout,weight_decay,max_epochs,total_steps,\
         learning_rate,optimizer,parameter_set,epoch,train_batch_count,valid_batch_count,dur,\
         train_loss,train_loss_best,valid_loss,valid_loss_best,valid_acc,valid_acc_best,\
         event_lr,train_acc,train_acc_best"
    );
    assert_eq!(
        lines[1],
        "1,500,4,0.0,1e-06,2,2,1e-05,SGD,3,1,10,10,0.5,1.25,True,1.5,False,0.25,True,4e-07,0.75,False"
    );
    assert_eq!(
        lines[2],
        "1,500,4,0.0,1e-06,2,2,1e-05,SGD,3,2,10,0,0.5,1.25,True,,,,,4e-07,0.75,False"
    );
}

#[test]
fn test_confusion_matrix_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("confusion.csv");
    let classes = vec!["Cortex".to_string(), "Primary motor area".to_string()];
    write_confusion_matrix(&path, &[vec![3, 1], vec![0, 4]], &classes, "TrueLabels").unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "Cortex,Primary motor area,TrueLabels\n3,1,Cortex\n0,4,Primary motor area\n"
    );

    let result = write_confusion_matrix(&path, &[vec![1]], &classes, "TrueLabels");
    assert!(matches!(result, Err(TrainingError::DataMismatch(_))));
}

#[test]
fn test_labelled_matrix_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("probabilities.csv");
    let matrix = ExpressionMatrix::new(
        vec!["Cortex".into(), "Striatum".into()],
        2,
        vec![0.25, 0.75, 1.0, 0.0],
    )
    .unwrap();
    let labels = vec!["Isocortex".to_string(), "Caudoputamen, dorsal".to_string()];
    write_labelled_matrix(&path, &matrix, "TrueLabel", &labels).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "Cortex,Striatum,TrueLabel\n0.25,0.75,Isocortex\n1.0,0.0,\"Caudoputamen, dorsal\"\n"
    );

    let result = write_labelled_matrix(&path, &matrix, "TrueLabel", &labels[..1]);
    assert!(matches!(result, Err(TrainingError::DataMismatch(_))));
}

#[test]
fn test_unwritable_path_is_report_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("out.csv");
    match write_performance(&path, &[]) {
        Err(TrainingError::Report { path: p, .. }) => assert!(p.ends_with("out.csv")),
        other => panic!("Expected Report error, got {other:?}"),
    }
}
