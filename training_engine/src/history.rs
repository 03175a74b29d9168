//! Per-epoch training history.

/// Metrics of one epoch. `*_best` flags mark a value strictly better than
/// every earlier epoch of the same fit (lower loss, higher accuracy).
#[derive(Debug, Clone, PartialEq)]
pub struct EpochRecord {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Mini-batches used for training.
    pub train_batch_count: usize,
    /// Mini-batches used for validation (0 without a validation set).
    pub valid_batch_count: usize,
    /// Wall-clock seconds for the epoch, evaluation included.
    pub dur: f64,
    /// Learning rate used during the epoch.
    pub event_lr: f64,
    /// Sample-weighted mean training loss over the epoch's batches.
    pub train_loss: f64,
    /// `train_loss` is the best so far.
    pub train_loss_best: bool,
    /// Validation loss in evaluation mode.
    pub valid_loss: Option<f64>,
    /// `valid_loss` is the best so far.
    pub valid_loss_best: Option<bool>,
    /// Validation accuracy in evaluation mode.
    pub valid_acc: Option<f64>,
    /// `valid_acc` is the best so far.
    pub valid_acc_best: Option<bool>,
    /// Training-set accuracy in evaluation mode after the epoch.
    pub train_acc: f64,
    /// `train_acc` is the best so far.
    pub train_acc_best: bool,
}

/// Raw epoch measurements, before best-so-far flags are known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochMeasurement {
    /// Mini-batches used for training.
    pub train_batch_count: usize,
    /// Mini-batches used for validation.
    pub valid_batch_count: usize,
    /// Wall-clock seconds.
    pub dur: f64,
    /// Learning rate.
    pub event_lr: f64,
    /// Training loss.
    pub train_loss: f64,
    /// Training accuracy.
    pub train_acc: f64,
    /// Validation loss and accuracy, if validated.
    pub validation: Option<(f64, f64)>,
}

/// Ordered epoch records of one fit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    records: Vec<EpochRecord>,
    best_train_loss: Option<f64>,
    best_train_acc: Option<f64>,
    best_valid_loss: Option<f64>,
    best_valid_acc: Option<f64>,
}

fn improves(best: &mut Option<f64>, value: f64, lower_is_better: bool) -> bool {
    let better = best.map_or(true, |b| if lower_is_better { value < b } else { value > b });
    if better {
        *best = Some(value);
    }
    better
}

impl History {
    /// Appends the next epoch and returns its record.
    pub fn push(&mut self, m: EpochMeasurement) -> &EpochRecord {
        let (valid_loss, valid_acc) = m.validation.unzip();
        let record = EpochRecord {
            epoch: self.records.len() + 1,
            train_batch_count: m.train_batch_count,
            valid_batch_count: m.valid_batch_count,
            dur: m.dur,
            event_lr: m.event_lr,
            train_loss: m.train_loss,
            train_loss_best: improves(&mut self.best_train_loss, m.train_loss, true),
            valid_loss,
            valid_loss_best: valid_loss.map(|v| improves(&mut self.best_valid_loss, v, true)),
            valid_acc,
            valid_acc_best: valid_acc.map(|v| improves(&mut self.best_valid_acc, v, false)),
            train_acc: m.train_acc,
            train_acc_best: improves(&mut self.best_train_acc, m.train_acc, false),
        };
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Records in epoch order.
    #[must_use]
    pub fn records(&self) -> &[EpochRecord] {
        &self.records
    }

    /// Last record, if any epoch ran.
    #[must_use]
    pub fn last(&self) -> Option<&EpochRecord> {
        self.records.last()
    }

    /// Number of epochs recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
