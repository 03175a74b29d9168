//! One-cycle learning-rate policy, stepped once per epoch.

use std::f64::consts::PI;

use crate::error::TrainingError;

/// One-cycle schedule with cosine annealing and no momentum cycling.
///
/// The rate warms up from `max_lr / div_factor` to `max_lr` over the first
/// `pct_start` of the steps, then anneals to
/// `max_lr / (div_factor * final_div_factor)` at step `total_steps - 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OneCycleLr {
    max_lr: f64,
    total_steps: usize,
    pct_start: f64,
    div_factor: f64,
    final_div_factor: f64,
}

impl OneCycleLr {
    /// Schedule with the usual defaults (`pct_start` 0.3, `div_factor` 25,
    /// `final_div_factor` 1e4).
    ///
    /// # Errors
    /// `TrainingError::InvalidConfig` for a non-positive `max_lr` or zero
    /// `total_steps`.
    pub fn new(max_lr: f64, total_steps: usize) -> Result<Self, TrainingError> {
        if !(max_lr.is_finite() && max_lr > 0.0) {
            return Err(TrainingError::InvalidConfig(format!(
                "learning rate must be positive, got {max_lr}"
            )));
        }
        if total_steps == 0 {
            return Err(TrainingError::InvalidConfig(
                "total_steps must be positive".into(),
            ));
        }
        Ok(Self {
            max_lr,
            total_steps,
            pct_start: 0.3,
            div_factor: 25.0,
            final_div_factor: 1e4,
        })
    }

    /// Fraction of the cycle spent warming up.
    ///
    /// # Errors
    /// `TrainingError::InvalidConfig` outside `(0, 1)`.
    pub fn with_pct_start(mut self, pct_start: f64) -> Result<Self, TrainingError> {
        if !(pct_start > 0.0 && pct_start < 1.0) {
            return Err(TrainingError::InvalidConfig(format!(
                "pct_start must lie in (0, 1), got {pct_start}"
            )));
        }
        self.pct_start = pct_start;
        Ok(self)
    }

    /// Number of steps in the cycle.
    #[must_use]
    pub const fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Rate at the start of the cycle.
    #[must_use]
    pub fn initial_lr(&self) -> f64 {
        self.max_lr / self.div_factor
    }

    /// Rate at the end of the cycle.
    #[must_use]
    pub fn min_lr(&self) -> f64 {
        self.initial_lr() / self.final_div_factor
    }

    /// Learning rate for 0-based `step`.
    ///
    /// # Errors
    /// `TrainingError::ScheduleExhausted` when `step >= total_steps`.
    #[allow(clippy::cast_precision_loss)]
    pub fn lr_at(&self, step: usize) -> Result<f64, TrainingError> {
        if step >= self.total_steps {
            return Err(TrainingError::ScheduleExhausted {
                step,
                total_steps: self.total_steps,
            });
        }
        let step = step as f64;
        let warmup_end = self.pct_start.mul_add(self.total_steps as f64, -1.0);
        let anneal_end = self.total_steps as f64 - 1.0;

        let lr = if step <= warmup_end {
            cosine(self.initial_lr(), self.max_lr, fraction(step, 0.0, warmup_end))
        } else {
            cosine(self.max_lr, self.min_lr(), fraction(step, warmup_end, anneal_end))
        };
        Ok(lr)
    }
}

fn fraction(step: f64, start: f64, end: f64) -> f64 {
    let span = end - start;
    if span > 0.0 {
        (step - start) / span
    } else {
        1.0
    }
}

fn cosine(start: f64, end: f64, pct: f64) -> f64 {
    ((start - end) / 2.0).mul_add((PI * pct).cos() + 1.0, end)
}
