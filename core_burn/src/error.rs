// core_burn/src/error.rs

//! Error type of the model layer.

/// Errors produced by the model layer.
#[derive(thiserror::Error, Debug)]
pub enum BurnCoreError {
    /// The model configuration cannot describe a valid network.
    #[error("Invalid model configuration: {0}")]
    InvalidConfig(String),

    /// Tensor dimensions disagree with the model or request.
    #[error("Incompatible tensor shape: {0}")]
    IncompatibleShape(String),

    /// Autodiff did not produce a gradient where one was required.
    #[error("Missing gradient: {0}")]
    MissingGradient(String),
}
