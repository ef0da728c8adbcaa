//! Numeric processing stages of the classification pipeline.
//!
//! * [`normalization`] - the affine operator shared by input and output
//! * [`preprocess`] - image to input tensor
//! * [`postprocess`] - raw output tensor to probabilities
//! * [`topk`] - bounded ranked selection

pub mod normalization;
pub mod postprocess;
pub mod preprocess;
pub mod topk;

pub use normalization::NormalizeOp;
pub use postprocess::Postprocessor;
pub use preprocess::{ImagePreprocessor, REFERENCE_SIDE};
pub use topk::TopKSelector;
