//! `train-mlp`: trains the voxel classifier and exports mouse/human
//! probabilities and latent transforms.

use anyhow::{Context, Result};
use clap::Parser;
use cli_app::{setup, TrainArgs};
use tracing::info;

fn main() -> Result<()> {
    let args = TrainArgs::parse();
    let app_config = setup::load_app_config(args.config.as_deref())?;
    setup::init_logging("train_mlp", &app_config)?;

    let config = args.into_config(&app_config)?;
    let outcome = training_engine::run_train_mlp(&config).context("Training failed")?;

    for path in &outcome.written {
        info!("Output: {}", path.display());
    }
    Ok(())
}
