//! Tensor aliases exchanged with the inference engine.

/// 2D tensor of f32 values, used for `{1, C}` probability outputs.
pub type Tensor2D = ndarray::Array2<f32>;

/// 4D tensor of f32 values, used for `{1, H, W, 3}` image inputs (NHWC).
pub type Tensor4D = ndarray::Array4<f32>;

/// Number of color channels in every input tensor.
pub const INPUT_CHANNELS: usize = 3;

/// Builds the `{1, H, W, 3}` input shape for a model input size.
pub fn input_shape(height: usize, width: usize) -> [usize; 4] {
    [1, height, width, INPUT_CHANNELS]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_shape_is_nhwc() {
        assert_eq!(input_shape(380, 380), [1, 380, 380, 3]);
    }
}
