use std::fs;
use std::path::PathBuf;

use clap::Parser;
use cli_app::{setup::load_app_config, TrainArgs, ValidationArgs};
use tempfile::tempdir;
use training_engine::{DeviceKind, OptimizerKind};
use utils_crate::AppConfig;

#[test]
fn test_validation_defaults() {
    let args = ValidationArgs::try_parse_from(["mlp-validation-resampling"]).unwrap();
    assert_eq!(args.datadir, PathBuf::from("data/"));
    assert_eq!(args.labels, "region5");
    assert_eq!(args.nlayers, [4]);
    assert_eq!(args.l2, [0.0]);
    assert_eq!(args.optimizer, [OptimizerKind::Sgd]);
    assert!(!args.confusionmatrix);
    assert_eq!(args.totalsteps, None);

    let config = args.into_config(&AppConfig::default()).unwrap();
    assert_eq!(config.grid.samples, [1]);
    assert_eq!(config.grid.learning_rate, [1e-5]);
    assert_eq!(config.batch_size, AppConfig::default().training.batch_size);
    assert_eq!(config.device, DeviceKind::Cpu);
    assert!(config
        .outfile_path()
        .ends_with("data/MLP_outcomes/MLP_validation_resampling_region5.csv"));
}

#[test]
fn test_validation_value_lists() {
    let args = ValidationArgs::try_parse_from([
        "mlp-validation-resampling",
        "--labels", "region67",
        "--nunits", "200", "500",
        "--L2", "0", "1e-6",
        "--nsamples", "3",
        "--totalsteps", "300",
        "--optimizer", "SGD", "AdamW",
        "--confusionmatrix", "true",
        "--seed", "7",
    ])
    .unwrap();
    let config = args.into_config(&AppConfig::default()).unwrap();
    assert_eq!(config.labels, "region67");
    assert_eq!(config.grid.samples, [1, 2, 3]);
    assert_eq!(config.grid.hidden_units, [200, 500]);
    assert_eq!(config.grid.weight_decay, [0.0, 1e-6]);
    assert_eq!(config.grid.total_steps, Some(vec![300]));
    assert_eq!(config.grid.optimizer, [OptimizerKind::Sgd, OptimizerKind::AdamW]);
    assert!(config.confusion_matrix);
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.grid.len(), 3 * 2 * 2 * 2);
}

#[test]
fn test_validation_rejects_bad_values() {
    assert!(ValidationArgs::try_parse_from(["x", "--labels", "region134"]).is_err());
    assert!(ValidationArgs::try_parse_from(["x", "--optimizer", "Adam"]).is_err());
    assert!(ValidationArgs::try_parse_from(["x", "--confusionmatrix", "yes"]).is_err());
}

#[test]
fn test_train_defaults() {
    let args = TrainArgs::try_parse_from(["train-mlp"]).unwrap();
    assert_eq!(args.mousedata, "region134");
    assert_eq!(args.humandata, "region166");
    assert!(args.voxeltransform);
    assert!(!args.integratedgrads);

    let config = args.into_config(&AppConfig::default()).unwrap();
    assert_eq!(config.trainer.hidden_units, 500);
    assert_eq!(config.trainer.hidden_layers, 3);
    assert!((config.trainer.weight_decay - 1e-6).abs() < f64::EPSILON);
    assert_eq!(config.trainer.total_steps, None);
    assert_eq!(config.ig_regions, ["Caudoputamen", "Primary motor area", "Infralimbic area"]);
    assert_eq!(config.ig_steps, AppConfig::default().training.integrated_gradient_steps);
}

#[test]
fn test_train_flags() {
    let args = TrainArgs::try_parse_from([
        "train-mlp",
        "--labels", "region67",
        "--humandata", "region88",
        "--nunits", "100",
        "--L2", "0.001",
        "--optimizer", "AdamW",
        "--voxeltransform", "false",
        "--integratedgrads", "true",
        "--igregions", "Caudoputamen",
    ])
    .unwrap();
    let config = args.into_config(&AppConfig::default()).unwrap();
    assert_eq!(config.human_data, "region88");
    assert_eq!(config.trainer.hidden_units, 100);
    assert_eq!(config.trainer.optimizer, OptimizerKind::AdamW);
    assert!(!config.voxel_transform);
    assert!(config.integrated_gradients);
    assert_eq!(config.ig_regions, ["Caudoputamen"]);
}

#[test]
fn test_config_file_sets_batch_size_and_device() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mlp.toml");
    fs::write(
        &path,
        "[logging]\nlevel = \"debug\"\n\n[training]\nbatch_size = 32\ndevice = \"cuda\"\n",
    )
    .unwrap();
    let app = load_app_config(Some(&path)).unwrap();
    assert_eq!(app.training.batch_size, 32);

    // CUDA resolves at run time; parsing only checks the name.
    let config = TrainArgs::try_parse_from(["train-mlp"]).unwrap().into_config(&app).unwrap();
    assert_eq!(config.trainer.batch_size, 32);
    assert_eq!(config.device, DeviceKind::Cuda);
}

#[test]
fn test_unknown_device_is_error() {
    let mut app = AppConfig::default();
    app.training.device = "tpu".into();
    assert!(TrainArgs::try_parse_from(["train-mlp"]).unwrap().into_config(&app).is_err());
}

#[test]
fn test_missing_config_file_is_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gpu.toml");
    let err = load_app_config(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("does not exist"), "{err}");

    assert_eq!(load_app_config(None).unwrap().training.batch_size, AppConfig::default().training.batch_size);
}
