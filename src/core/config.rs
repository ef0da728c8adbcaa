//! Runtime configuration for inference sessions.
//!
//! These types carry the device and threading choices from the caller down to
//! session creation. They are plain immutable data; validation happens once,
//! before any resource is acquired.

use serde::{Deserialize, Serialize};

use crate::core::errors::{ClassifyError, ClassifyResult};

/// The runtime device used to execute the forward pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Device {
    /// Run on the CPU, parallelized across the configured thread count.
    #[default]
    Cpu,
    /// Run on a GPU accelerator. Opening fails if none is available;
    /// there is no automatic CPU fallback.
    Gpu,
}

/// Options applied when an inference session is opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Target device for the forward pass.
    pub device: Device,
    /// Number of CPU threads for intra-op parallelism. Must be at least 1.
    /// Ignored when an accelerator executes the graph; the accelerator owns
    /// its own parallelism.
    pub num_threads: usize,
}

impl SessionOptions {
    /// Creates options for the given device and thread count.
    pub fn new(device: Device, num_threads: usize) -> Self {
        Self {
            device,
            num_threads,
        }
    }

    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the thread count is zero.
    pub fn validate(&self) -> ClassifyResult<()> {
        if self.num_threads == 0 {
            return Err(ClassifyError::invalid_config(
                "num_threads must be at least 1",
            ));
        }
        Ok(())
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            device: Device::Cpu,
            num_threads: 1,
        }
    }
}

/// Display rotation reported by the host, in degrees.
///
/// Only consulted when the caller opts into orientation-aware cropping; the
/// default pipeline leaves the image as decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// No rotation.
    #[default]
    Deg0,
    /// Rotated 90 degrees clockwise.
    Deg90,
    /// Rotated 180 degrees.
    Deg180,
    /// Rotated 270 degrees clockwise.
    Deg270,
}

impl Orientation {
    /// The rotation angle in degrees.
    pub fn degrees(self) -> u32 {
        match self {
            Orientation::Deg0 => 0,
            Orientation::Deg90 => 90,
            Orientation::Deg180 => 180,
            Orientation::Deg270 => 270,
        }
    }

    /// Parses an orientation from a degree value.
    ///
    /// Returns `None` for anything other than 0, 90, 180 or 270.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            0 => Some(Orientation::Deg0),
            90 => Some(Orientation::Deg90),
            180 => Some(Orientation::Deg180),
            270 => Some(Orientation::Deg270),
            _ => None,
        }
    }
}

/// Host hook that reports the current display rotation.
///
/// Implemented by the embedding application when it wants orientation-aware
/// cropping. Not exercised by the default pipeline.
pub trait OrientationProvider {
    /// Returns the current display rotation.
    fn rotation(&self) -> Orientation;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_cpu_single_thread() {
        let options = SessionOptions::default();
        assert_eq!(options.device, Device::Cpu);
        assert_eq!(options.num_threads, 1);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn zero_threads_is_rejected() {
        let options = SessionOptions::new(Device::Cpu, 0);
        assert!(matches!(
            options.validate(),
            Err(ClassifyError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn orientation_degree_round_trip() {
        for orientation in [
            Orientation::Deg0,
            Orientation::Deg90,
            Orientation::Deg180,
            Orientation::Deg270,
        ] {
            assert_eq!(
                Orientation::from_degrees(orientation.degrees()),
                Some(orientation)
            );
        }
        assert_eq!(Orientation::from_degrees(45), None);
    }
}
