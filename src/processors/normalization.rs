//! Affine normalization shared by input preprocessing and output
//! dequantization.
//!
//! The same operator covers both uses: raw pixels are mapped into the
//! network's input range, and raw output values are mapped back to
//! probabilities. For the shipped float model the output operator is the
//! identity (mean 0, std 1); the code path exists so quantized variants can
//! substitute non-trivial parameters without touching the pipeline.

use serde::{Deserialize, Serialize};

use crate::core::errors::{ClassifyError, ClassifyResult};

/// Pure elementwise affine transform `y = (x - mean) / std`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizeOp {
    mean: f32,
    std: f32,
}

impl NormalizeOp {
    /// Creates a normalization operator from its mean and standard deviation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `std` is zero or either value is not finite.
    pub fn new(mean: f32, std: f32) -> ClassifyResult<Self> {
        if !mean.is_finite() || !std.is_finite() {
            return Err(ClassifyError::invalid_config(format!(
                "normalization parameters must be finite, got mean {mean} std {std}"
            )));
        }
        if std == 0.0 {
            return Err(ClassifyError::invalid_config(
                "normalization std must be non-zero",
            ));
        }
        Ok(Self { mean, std })
    }

    /// The identity operator (mean 0, std 1), used for float-model outputs.
    pub fn identity() -> Self {
        Self {
            mean: 0.0,
            std: 1.0,
        }
    }

    /// Applies the transform to one value.
    pub fn apply(&self, x: f32) -> f32 {
        (x - self.mean) / self.std
    }

    /// Applies the transform to every element in place.
    pub fn apply_slice(&self, values: &mut [f32]) {
        for value in values {
            *value = (*value - self.mean) / self.std;
        }
    }

    /// The mean this operator subtracts.
    pub fn mean(&self) -> f32 {
        self.mean
    }

    /// The standard deviation this operator divides by.
    pub fn std(&self) -> f32 {
        self.std
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_leaves_values_unchanged() {
        let op = NormalizeOp::identity();
        for x in [-1.0f32, 0.0, 0.5, 1.0, 255.0] {
            assert_eq!(op.apply(x), x);
        }
    }

    #[test]
    fn byte_range_maps_to_unit_interval() {
        // The shipped input operator maps [0, 255] onto [-1, 1].
        let op = NormalizeOp::new(127.5, 127.5).unwrap();
        assert_eq!(op.apply(0.0), -1.0);
        assert_eq!(op.apply(127.5), 0.0);
        assert_eq!(op.apply(255.0), 1.0);
    }

    #[test]
    fn slice_application_matches_scalar() {
        let op = NormalizeOp::new(127.5, 127.5).unwrap();
        let mut values = [0.0f32, 51.0, 255.0];
        op.apply_slice(&mut values);
        assert_eq!(values, [op.apply(0.0), op.apply(51.0), op.apply(255.0)]);
    }

    #[test]
    fn zero_std_is_rejected() {
        assert!(matches!(
            NormalizeOp::new(127.5, 0.0),
            Err(ClassifyError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn non_finite_parameters_are_rejected() {
        assert!(NormalizeOp::new(f32::NAN, 1.0).is_err());
        assert!(NormalizeOp::new(0.0, f32::INFINITY).is_err());
    }
}
