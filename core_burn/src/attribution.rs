// core_burn/src/attribution.rs

//! Integrated-gradients attribution for [`MlpClassifier`].
//!
//! For a target class `t`, the attribution of feature `j` of sample `x` is
//! `(x_j - b_j) * ∫₀¹ ∂p_t(b + α(x - b)) / ∂x_j dα`, where `p_t` is the
//! softmax probability of `t` and `b` the baseline (all zeros here). The
//! integral is approximated with Gauss-Legendre quadrature on `[0, 1]`.

use burn::tensor::{
    backend::{AutodiffBackend, Backend},
    Tensor,
};
use tracing::debug;

use crate::{error::BurnCoreError, mlp::MlpClassifier};

/// Integrated gradients with a zero baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegratedGradients {
    steps: usize,
}

impl Default for IntegratedGradients {
    fn default() -> Self {
        Self { steps: 50 }
    }
}

impl IntegratedGradients {
    /// Uses `steps` Gauss-Legendre points along the straight path from the
    /// baseline to the input.
    ///
    /// # Errors
    /// `BurnCoreError::InvalidConfig` if `steps < 2`.
    pub fn new(steps: usize) -> Result<Self, BurnCoreError> {
        if steps < 2 {
            return Err(BurnCoreError::InvalidConfig(format!(
                "integrated gradients need at least 2 steps, got {steps}"
            )));
        }
        Ok(Self { steps })
    }

    /// Number of evaluation points.
    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Path positions `α` in ascending order with their Gauss-Legendre
    /// weights (summing to one). Endpoints are never evaluated.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn nodes(&self) -> Vec<(f64, f64)> {
        let n = self.steps;
        let mut nodes = vec![(0.0, 0.0); n];
        for i in 0..n.div_ceil(2) {
            // Newton iteration from the Chebyshev-like initial guess of the
            // i-th largest root of P_n.
            let mut z = (std::f64::consts::PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
            let mut derivative = 1.0;
            for _ in 0..100 {
                let (p_n, p_prev) = legendre(n, z);
                derivative = n as f64 * (z * p_n - p_prev) / (z * z - 1.0);
                let delta = p_n / derivative;
                z -= delta;
                if delta.abs() < 1e-15 {
                    break;
                }
            }
            // Weight 2 / ((1 - z²) P'(z)²) on [-1, 1], halved for [0, 1].
            let weight = 1.0 / ((1.0 - z * z) * derivative * derivative);
            nodes[i] = ((1.0 - z) / 2.0, weight);
            nodes[n - 1 - i] = ((1.0 + z) / 2.0, weight);
        }
        nodes
    }

    /// Per-sample attributions `[n, features]` of `inputs` towards class
    /// `target`.
    ///
    /// Dropout is disabled on a copy of the model for the computation.
    ///
    /// # Errors
    /// `IncompatibleShape` if `target` is not a class of the model,
    /// `MissingGradient` if autodiff yields no input gradient.
    pub fn attribute<B: AutodiffBackend>(
        &self,
        model: &MlpClassifier<B>,
        inputs: Tensor<B::InnerBackend, 2>,
        target: usize,
    ) -> Result<Tensor<B::InnerBackend, 2>, BurnCoreError> {
        let model = model.clone().without_dropout();
        let [n, features] = inputs.dims();
        debug!(
            "Integrated gradients: {} samples x {} features, target {}, {} steps",
            n, features, target, self.steps
        );

        let mut integrated: Option<Tensor<B::InnerBackend, 2>> = None;
        for (alpha, weight) in self.nodes() {
            let point = Tensor::<B, 2>::from_inner(inputs.clone().mul_scalar(alpha)).require_grad();
            let probabilities = model.forward_probabilities(point.clone());
            let [_, classes] = probabilities.dims();
            if target >= classes {
                return Err(BurnCoreError::IncompatibleShape(format!(
                    "target class {target} but the model has {classes} classes"
                )));
            }
            // Samples are independent, so the gradient of the summed
            // probability is the per-sample gradient.
            let objective = probabilities.slice([0..n, target..target + 1]).sum();
            let gradients = objective.backward();
            let gradient = point.grad(&gradients).ok_or_else(|| {
                BurnCoreError::MissingGradient(format!("input gradient at alpha = {alpha}"))
            })?;
            let weighted = gradient.mul_scalar(weight);
            integrated = Some(match integrated {
                Some(sum) => sum.add(weighted),
                None => weighted,
            });
        }

        let integrated = integrated.ok_or_else(|| {
            BurnCoreError::InvalidConfig("integrated gradients without steps".into())
        })?;
        Ok(inputs.mul(integrated))
    }
}

/// `(P_n(z), P_{n-1}(z))` by the three-term recurrence.
#[allow(clippy::cast_precision_loss)]
fn legendre(n: usize, z: f64) -> (f64, f64) {
    let (mut current, mut previous) = (1.0, 0.0);
    for j in 1..=n {
        let j = j as f64;
        let next = ((2.0 * j - 1.0) * z * current - (j - 1.0) * previous) / j;
        previous = current;
        current = next;
    }
    (current, previous)
}

/// Mean attribution per feature over all samples.
pub fn mean_over_samples<B: Backend>(attributions: Tensor<B, 2>) -> Vec<f32> {
    attributions
        .mean_dim(0)
        .into_data()
        .iter::<f32>()
        .collect()
}
