//! `mlp-validation-resampling`: hyperparameter sweep over coronal/sagittal
//! resamples.

use anyhow::{Context, Result};
use clap::Parser;
use cli_app::{setup, ValidationArgs};
use tracing::info;

fn main() -> Result<()> {
    let args = ValidationArgs::parse();
    let app_config = setup::load_app_config(args.config.as_deref())?;
    setup::init_logging("mlp_validation_resampling", &app_config)?;

    let config = args.into_config(&app_config)?;
    let outcome = training_engine::run_validation_resampling(&config)
        .context("Resampling validation failed")?;

    info!(
        "Wrote {} epoch rows to {}",
        outcome.rows.len(),
        outcome.performance_path.display()
    );
    Ok(())
}
