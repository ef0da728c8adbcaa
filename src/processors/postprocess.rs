//! Output tensor post-processing.
//!
//! Dequantizes the raw `{1, C}` output into per-class probabilities. The
//! label join happens in the top-k selector against the shared label table;
//! the table length was validated against C once at session open, so nothing
//! is re-checked per call.

use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::core::tensor::Tensor2D;
use crate::processors::normalization::NormalizeOp;

/// Applies the output normalization operator to a raw output tensor.
#[derive(Debug, Clone)]
pub struct Postprocessor {
    normalize: NormalizeOp,
}

impl Postprocessor {
    /// Creates a postprocessor with the model variant's output operator.
    pub fn new(normalize: NormalizeOp) -> Self {
        Self { normalize }
    }

    /// Dequantizes a `{1, C}` output tensor into C probabilities.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the tensor does not have a single row.
    pub fn run(&self, output: &Tensor2D) -> ClassifyResult<Vec<f32>> {
        let shape = output.shape();
        if shape[0] != 1 {
            return Err(ClassifyError::shape_mismatch(&[1, shape[1]], shape));
        }

        let mut probabilities = output.row(0).to_vec();
        self.normalize.apply_slice(&mut probabilities);
        Ok(probabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn identity_operator_passes_probabilities_through() {
        let postprocessor = Postprocessor::new(NormalizeOp::identity());
        let output = array![[0.10f32, 0.75, 0.15]];
        assert_eq!(postprocessor.run(&output).unwrap(), vec![0.10, 0.75, 0.15]);
    }

    #[test]
    fn quantized_style_operator_rescales() {
        // A non-trivial operator, as a fixed-point variant would configure.
        let postprocessor = Postprocessor::new(NormalizeOp::new(0.0, 255.0).unwrap());
        let output = array![[0.0f32, 127.5, 255.0]];
        assert_eq!(postprocessor.run(&output).unwrap(), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn multi_row_output_is_rejected() {
        let postprocessor = Postprocessor::new(NormalizeOp::identity());
        let output = array![[0.5f32, 0.5], [0.5, 0.5]];
        assert!(matches!(
            postprocessor.run(&output),
            Err(ClassifyError::ShapeMismatch { .. })
        ));
    }
}
