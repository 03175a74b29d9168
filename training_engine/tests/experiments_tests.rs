use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use expression_loader::files;
use tempfile::tempdir;
use training_engine::{
    run_train_mlp, run_validation_resampling, DeviceKind, HyperparameterGrid, OptimizerKind,
    TrainConfig, TrainerConfig, TrainingError, ValidationConfig,
};

const REGIONS: [&str; 2] = ["Caudoputamen", "Infralimbic area"];

/// Writes `rows` rows: gene columns with row-dependent values, then one
/// label column cycling through `labels`.
#[allow(clippy::cast_precision_loss)]
fn write_matrix(dir: &Path, name: &str, genes: &[&str], label_column: &str, labels: &[&str], rows: usize) {
    let mut text = format!("{},{label_column}\n", genes.join(","));
    for i in 0..rows {
        let class = i % labels.len();
        let cells: Vec<String> = (0..genes.len())
            .map(|j| {
                let signal = if (j + class) % 2 == 0 { 2.0 } else { -1.0 };
                format!("{}", signal + 0.05 * ((i * 7 + j * 3) % 11) as f64)
            })
            .collect();
        writeln!(text, "{},{}", cells.join(","), labels[class]).unwrap();
    }
    fs::write(dir.join(name), text).unwrap();
}

fn validation_config(data_dir: &Path, out_dir: &Path) -> ValidationConfig {
    ValidationConfig {
        data_dir: data_dir.to_path_buf(),
        out_dir: out_dir.to_path_buf(),
        outfile: None,
        labels: "region5".into(),
        grid: HyperparameterGrid {
            samples: vec![1, 2],
            hidden_units: vec![8],
            hidden_layers: vec![1],
            dropout: vec![0.0],
            weight_decay: vec![0.0],
            max_epochs: vec![2],
            total_steps: None,
            learning_rate: vec![1e-3],
            optimizer: vec![OptimizerKind::AdamW],
        },
        confusion_matrix: true,
        seed: Some(1),
        batch_size: 4,
        device: DeviceKind::Cpu,
    }
}

fn write_resampling_inputs(dir: &Path) {
    write_matrix(dir, files::CORONAL_REFERENCE, &["Gad1", "Pvalb", "Sst", "Vip"], "Region5", &REGIONS, 4);
    write_matrix(dir, files::SAGITTAL, &["Gad1", "Pvalb", "Sst"], "Region5", &REGIONS, 12);
    write_matrix(
        dir,
        files::CORONAL_SAGITTAL_MASK,
        &["Gad1", "Pvalb...1", "Pvalb...2", "Sst", "Vip"],
        "Region5",
        &REGIONS,
        12,
    );
}

#[test]
fn test_validation_resampling_end_to_end() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    let out_dir = out.path().join("MLP_outcomes");
    write_resampling_inputs(data.path());

    let config = validation_config(data.path(), &out_dir);
    let outcome = run_validation_resampling(&config).unwrap();

    assert_eq!(
        outcome.performance_path,
        out_dir.join("MLP_validation_resampling_region5.csv")
    );
    assert_eq!(outcome.rows.len(), 4);
    let keys: Vec<(u64, usize, usize)> = outcome
        .rows
        .iter()
        .map(|r| (r.parameters.sample, r.parameters.parameter_set, r.epoch.epoch))
        .collect();
    assert_eq!(keys, [(1, 1, 1), (1, 1, 2), (2, 1, 1), (2, 1, 2)]);
    assert!(outcome.rows.iter().all(|r| r.epoch.valid_acc.is_some()));

    let table = fs::read_to_string(&outcome.performance_path).unwrap();
    assert_eq!(table.lines().count(), 5);
    assert!(table.starts_with("sample,hidden_units,hidden_layers,dropout"));

    assert_eq!(outcome.confusion_matrices.len(), 2);
    let confusion = fs::read_to_string(&outcome.confusion_matrices[0]).unwrap();
    assert!(confusion.starts_with("Caudoputamen,Infralimbic area,TrueLabels\n"));
}

#[test]
fn test_validation_resampling_custom_outfile_and_missing_input() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_resampling_inputs(data.path());

    let mut config = validation_config(data.path(), out.path());
    config.outfile = Some("custom.csv".into());
    config.confusion_matrix = false;
    config.grid.samples = vec![1];
    let outcome = run_validation_resampling(&config).unwrap();
    assert!(out.path().join("custom.csv").is_file());
    assert!(outcome.confusion_matrices.is_empty());

    fs::remove_file(data.path().join(files::SAGITTAL)).unwrap();
    assert!(run_validation_resampling(&config).is_err());
}

fn train_config(data_dir: &Path, out_dir: &Path) -> TrainConfig {
    TrainConfig {
        data_dir: data_dir.to_path_buf(),
        out_dir: out_dir.to_path_buf(),
        labels: "region5".into(),
        mouse_data: "region5".into(),
        human_data: "region5".into(),
        trainer: TrainerConfig {
            hidden_units: 8,
            hidden_layers: 2,
            weight_decay: 1e-6,
            max_epochs: 2,
            learning_rate: 1e-3,
            batch_size: 4,
            seed: Some(3),
            ..TrainerConfig::default()
        },
        confusion_matrix: true,
        voxel_transform: true,
        integrated_gradients: true,
        ig_regions: REGIONS.map(String::from).to_vec(),
        ig_steps: 4,
        device: DeviceKind::Cpu,
    }
}

fn write_training_inputs(dir: &Path) {
    write_matrix(dir, files::TRAINING_VOXELS, &["Gad1", "Pvalb", "Sst", "Vip"], "Region5", &REGIONS, 12);
    write_matrix(
        dir,
        &files::mouse_roi("region5"),
        &["Vip", "Sst", "Gad1", "Pvalb"],
        "Region",
        &["Striatum", "Cortex"],
        2,
    );
    write_matrix(
        dir,
        &files::human_roi("region5"),
        &["Sst", "Gad1", "Pvalb"],
        "Region",
        &["Striatum", "Cortex"],
        2,
    );
    write_matrix(dir, files::HUMAN_SAMPLES, &["Pvalb", "Gad1", "Sst"], "Region5", &["Cortex"], 3);
}

#[test]
fn test_train_mlp_writes_every_output() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_training_inputs(data.path());

    let outcome = run_train_mlp(&train_config(data.path(), out.path())).unwrap();
    assert!((0.0..=1.0).contains(&outcome.training_accuracy));

    let names: Vec<String> = outcome
        .written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    let stem = "Region5_Layers2_Units8_L21e-06";
    assert_eq!(
        names,
        [
            format!("MLP_ConfusionMatrix_Training_{stem}.csv"),
            format!("MLP_{stem}_IntegratedGradients.csv"),
            format!("MLP_{stem}_MouseProb_Region5.csv"),
            format!("MLP_{stem}_HumanProb_Region5.csv"),
            format!("MLP_{stem}_MouseTx_Region5.csv"),
            format!("MLP_{stem}_HumanTx_Region5.csv"),
            format!("MLP_{stem}_MouseVoxelTx.csv"),
            format!("MLP_{stem}_HumanVoxelTx.csv"),
        ]
    );
    assert!(outcome.written.iter().all(|p| p.is_file()));

    let read = |suffix: &str| fs::read_to_string(out.path().join(format!("MLP_{stem}_{suffix}.csv"))).unwrap();

    // Training genes are the voxel genes present in the human matrix.
    let gradients = read("IntegratedGradients");
    assert!(gradients.starts_with("Gad1,Pvalb,Sst,Region\n"));
    assert_eq!(gradients.lines().count(), 3);
    assert!(gradients.lines().nth(2).unwrap().ends_with(",Infralimbic area"));

    let human_prob = read("HumanProb_Region5");
    assert!(human_prob.starts_with("Caudoputamen,Infralimbic area,TrueLabel\n"));
    assert!(human_prob.lines().nth(1).unwrap().ends_with(",Striatum"));

    let mouse_tx = read("MouseTx_Region5");
    assert!(mouse_tx.starts_with("0,1,2,3,4,5,6,7,Region\n"));

    let human_voxels = read("HumanVoxelTx");
    assert_eq!(human_voxels.lines().count(), 4);
    assert!(human_voxels.lines().skip(1).all(|l| l.ends_with(",Cortex")));
}

#[test]
fn test_train_mlp_optional_outputs_off() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_training_inputs(data.path());

    let mut config = train_config(data.path(), out.path());
    config.confusion_matrix = false;
    config.voxel_transform = false;
    config.integrated_gradients = false;
    let outcome = run_train_mlp(&config).unwrap();
    assert_eq!(outcome.written.len(), 4);
}

#[test]
fn test_train_mlp_unknown_attribution_region() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_training_inputs(data.path());

    let mut config = train_config(data.path(), out.path());
    config.ig_regions = vec!["Primary motor area".into()];
    match run_train_mlp(&config) {
        Err(TrainingError::UnknownLabel(region)) => assert_eq!(region, "Primary motor area"),
        other => panic!("Expected UnknownLabel, got {:?}", other.err()),
    }
}
