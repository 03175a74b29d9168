// core_burn/src/lib.rs

#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![deny(
    unsafe_code,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! # `core_burn`
//!
//! Model layer of the workspace, built on [Burn](https://burn.dev/): the
//! multilayer-perceptron region classifier and integrated-gradients
//! attribution over its inputs.
//!
//! - `mlp`: `MlpClassifier` and its `MlpClassifierConfig`.
//! - `attribution`: `IntegratedGradients`.
//! - `error`: `BurnCoreError`.

pub mod attribution;
pub mod error;
pub mod mlp;

pub use attribution::{mean_over_samples, IntegratedGradients};
pub use error::BurnCoreError;
pub use mlp::{MlpClassifier, MlpClassifierConfig, MlpClassifierRecord};
