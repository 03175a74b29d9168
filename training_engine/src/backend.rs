//! Compile-time backend selection.

use std::str::FromStr;

use burn::tensor::backend::Backend;

use crate::error::TrainingError;

#[cfg(not(any(feature = "ndarray_backend", feature = "tch_backend")))]
compile_error!("training_engine needs one of the `ndarray_backend` or `tch_backend` features");

/// Tensor backend the experiments run on.
#[cfg(feature = "ndarray_backend")]
pub type InnerBackend = burn_ndarray::NdArray<f32>;
/// Tensor backend the experiments run on.
#[cfg(all(feature = "tch_backend", not(feature = "ndarray_backend")))]
pub type InnerBackend = burn_tch::LibTorch<f32>;

/// Autodiff backend used for training.
pub type TrainBackend = burn_autodiff::Autodiff<InnerBackend>;

/// Device of the selected backend.
pub type TrainDevice = <InnerBackend as Backend>::Device;

/// Requested compute device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// Host CPU.
    Cpu,
    /// First CUDA GPU.
    Cuda,
}

impl FromStr for DeviceKind {
    type Err = TrainingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "cuda" | "gpu" => Ok(Self::Cuda),
            other => Err(TrainingError::UnsupportedDevice(format!(
                "unknown device '{other}' (expected 'cpu' or 'cuda')"
            ))),
        }
    }
}

/// Resolves a device for the compiled backend.
///
/// # Errors
/// `TrainingError::UnsupportedDevice` when CUDA is requested from a CPU-only
/// backend.
pub fn device_for(kind: DeviceKind) -> Result<TrainDevice, TrainingError> {
    #[cfg(feature = "ndarray_backend")]
    {
        match kind {
            DeviceKind::Cpu => Ok(burn_ndarray::NdArrayDevice::Cpu),
            DeviceKind::Cuda => Err(TrainingError::UnsupportedDevice(
                "CUDA requires the tch_backend feature".into(),
            )),
        }
    }
    #[cfg(all(feature = "tch_backend", not(feature = "ndarray_backend")))]
    {
        match kind {
            DeviceKind::Cpu => Ok(burn_tch::LibTorchDevice::Cpu),
            DeviceKind::Cuda => Ok(burn_tch::LibTorchDevice::Cuda(0)),
        }
    }
}

/// Human-readable name of the device, for progress messages.
#[must_use]
pub const fn describe(kind: DeviceKind) -> &'static str {
    match kind {
        DeviceKind::Cpu => "CPU",
        DeviceKind::Cuda => "GPU",
    }
}
