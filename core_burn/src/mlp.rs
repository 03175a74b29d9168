// core_burn/src/mlp.rs

//! Multilayer-perceptron region classifier.
//!
//! The network is a stack of `Linear -> ReLU -> Dropout` hidden blocks
//! followed by a linear output layer. `forward` returns logits; the class
//! probabilities are their softmax, and training minimises the mean
//! cross-entropy, which is the negative log-likelihood of those
//! probabilities.

use burn::{
    config::Config,
    module::Module,
    nn::{loss::CrossEntropyLossConfig, Dropout, DropoutConfig, Linear, LinearConfig, Relu},
    tensor::{activation::softmax, backend::Backend, Int, Tensor},
};
use tracing::debug;

use crate::error::BurnCoreError;

/// Configuration of an [`MlpClassifier`].
#[derive(Config, Debug)]
pub struct MlpClassifierConfig {
    /// Number of input features (genes).
    pub input_units: usize,
    /// Number of classes (regions).
    pub output_units: usize,
    /// Width of every hidden layer.
    #[config(default = 500)]
    pub hidden_units: usize,
    /// Number of hidden blocks.
    #[config(default = 1)]
    pub num_hidden: usize,
    /// Dropout probability after each hidden activation.
    #[config(default = 0.0)]
    pub dropout: f64,
}

impl MlpClassifierConfig {
    /// Checks that the configuration describes a usable network.
    ///
    /// # Errors
    /// `BurnCoreError::InvalidConfig` for zero-sized layers or a dropout
    /// probability outside `[0, 1)`.
    pub fn validate(&self) -> Result<(), BurnCoreError> {
        let mut errors: Vec<String> = Vec::new();
        if self.input_units == 0 {
            errors.push("input_units must be positive".into());
        }
        if self.output_units == 0 {
            errors.push("output_units must be positive".into());
        }
        if self.num_hidden > 0 && self.hidden_units == 0 {
            errors.push("hidden_units must be positive".into());
        }
        if !(0.0..1.0).contains(&self.dropout) {
            errors.push(format!("dropout must lie in [0, 1), got {}", self.dropout));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(BurnCoreError::InvalidConfig(errors.join("; ")))
        }
    }

    /// Builds the classifier with freshly initialised weights.
    ///
    /// Linear layers use Burn's default Kaiming-uniform initialisation.
    ///
    /// # Arguments
    /// * `device`: Device the parameters are allocated on.
    ///
    /// # Errors
    /// See [`MlpClassifierConfig::validate`].
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<MlpClassifier<B>, BurnCoreError> {
        self.validate()?;

        let hidden: Vec<Linear<B>> = (0..self.num_hidden)
            .map(|layer| {
                let d_input = if layer == 0 {
                    self.input_units
                } else {
                    self.hidden_units
                };
                LinearConfig::new(d_input, self.hidden_units).init(device)
            })
            .collect();
        let d_last = if self.num_hidden == 0 {
            self.input_units
        } else {
            self.hidden_units
        };
        let output = LinearConfig::new(d_last, self.output_units).init(device);

        debug!(
            "Initialised MLP: {} -> {} x {} -> {} (dropout {})",
            self.input_units, self.num_hidden, self.hidden_units, self.output_units, self.dropout
        );

        Ok(MlpClassifier {
            hidden,
            output,
            dropout: DropoutConfig::new(self.dropout).init(),
            activation: Relu::new(),
        })
    }
}

/// Feed-forward classifier over expression profiles.
#[derive(Module, Debug)]
pub struct MlpClassifier<B: Backend> {
    hidden: Vec<Linear<B>>,
    output: Linear<B>,
    dropout: Dropout,
    activation: Relu,
}

impl<B: Backend> MlpClassifier<B> {
    /// Logits for a batch `[n, input_units] -> [n, output_units]`.
    pub fn forward(&self, inputs: Tensor<B, 2>) -> Tensor<B, 2> {
        self.output.forward(self.forward_latent(inputs))
    }

    /// Class probabilities (softmax over the logits).
    pub fn forward_probabilities(&self, inputs: Tensor<B, 2>) -> Tensor<B, 2> {
        softmax(self.forward(inputs), 1)
    }

    /// Activations of the last hidden block, i.e. the network with its
    /// output layer removed. Returns the inputs when there are no hidden
    /// blocks.
    pub fn forward_latent(&self, inputs: Tensor<B, 2>) -> Tensor<B, 2> {
        self.hidden.iter().fold(inputs, |x, layer| {
            let x = self.activation.forward(layer.forward(x));
            self.dropout.forward(x)
        })
    }

    /// Mean cross-entropy of the batch against integer class targets.
    pub fn loss(&self, inputs: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> Tensor<B, 1> {
        let logits = self.forward(inputs);
        CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits, targets)
    }

    /// Number of hidden blocks.
    #[must_use]
    pub fn num_hidden(&self) -> usize {
        self.hidden.len()
    }

    /// Same network with dropout switched off, for gradient-based analysis
    /// on an autodiff backend where dropout would otherwise be active.
    #[must_use]
    pub fn without_dropout(mut self) -> Self {
        self.dropout = DropoutConfig::new(0.0).init();
        self
    }
}
