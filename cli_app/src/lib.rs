#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! Argument parsing and start-up shared by the `train-mlp` and
//! `mlp-validation-resampling` binaries.

pub mod args;
pub mod setup;

pub use args::{TrainArgs, ValidationArgs};
