//! Shipped model variants.
//!
//! A variant is plain data: two asset names and two normalization pairs.
//! The pipeline never branches on which variant is active; swapping a model
//! means supplying a different `ModelSpec`, nothing more. Exactly one
//! variant ships today.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::ClassifyResult;
use crate::processors::normalization::NormalizeOp;

/// Everything that distinguishes one model variant from another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Model file name, resolved against the asset directory.
    pub model_file: String,
    /// Label file name, resolved against the asset directory.
    pub label_file: String,
    /// Mean subtracted from raw pixel values on the way in.
    pub input_mean: f32,
    /// Standard deviation dividing raw pixel values on the way in.
    pub input_std: f32,
    /// Mean subtracted from raw output values on the way out.
    pub output_mean: f32,
    /// Standard deviation dividing raw output values on the way out.
    pub output_std: f32,
}

impl ModelSpec {
    /// The input normalization operator for this variant.
    pub fn input_normalization(&self) -> ClassifyResult<NormalizeOp> {
        NormalizeOp::new(self.input_mean, self.input_std)
    }

    /// The output normalization operator for this variant.
    pub fn output_normalization(&self) -> ClassifyResult<NormalizeOp> {
        NormalizeOp::new(self.output_mean, self.output_std)
    }

    /// Full path of the model file under `asset_dir`.
    pub fn model_path(&self, asset_dir: &Path) -> PathBuf {
        asset_dir.join(&self.model_file)
    }

    /// Full path of the label file under `asset_dir`.
    pub fn label_path(&self, asset_dir: &Path) -> PathBuf {
        asset_dir.join(&self.label_file)
    }
}

/// The EfficientNet-B4 float variant.
///
/// Pixels are mapped from [0, 255] into [-1, 1] on the way in. The float
/// model needs no dequantization on the way out, so the output pair is the
/// identity; a quantized variant would substitute its own mean and std here.
pub fn efficientnet_b4() -> ModelSpec {
    ModelSpec {
        model_file: "model-enb4.onnx".to_string(),
        label_file: "labels-enb4.txt".to_string(),
        input_mean: 127.5,
        input_std: 127.5,
        output_mean: 0.0,
        output_std: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_variant_normalization_pairs() {
        let spec = efficientnet_b4();

        let input = spec.input_normalization().unwrap();
        assert_eq!(input.apply(0.0), -1.0);
        assert_eq!(input.apply(255.0), 1.0);

        let output = spec.output_normalization().unwrap();
        assert_eq!(output, NormalizeOp::identity());
    }

    #[test]
    fn asset_paths_resolve_under_the_asset_dir() {
        let spec = efficientnet_b4();
        let dir = Path::new("/data/assets");
        assert_eq!(spec.model_path(dir), dir.join("model-enb4.onnx"));
        assert_eq!(spec.label_path(dir), dir.join("labels-enb4.txt"));
    }
}
