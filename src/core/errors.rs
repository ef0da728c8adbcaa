//! Error types for the classification pipeline.
//!
//! This module defines the errors that can occur while opening a classifier,
//! preprocessing an image, running the forward pass, and selecting results.
//! Helper constructors keep call sites short and attach context consistently.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Enum representing the errors surfaced by the classification pipeline.
///
/// Every error is unrecoverable at the point it occurs and is returned
/// synchronously to the caller. The pipeline performs no retries and no
/// silent fallback (in particular, no GPU to CPU downgrade).
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The model file could not be read or parsed into a session.
    #[error("model load failed for {}: {message}", .path.display())]
    ModelLoad {
        /// Path of the model that failed to load.
        path: PathBuf,
        /// What went wrong.
        message: String,
        /// The underlying error, if one was reported.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The label file could not be read or contained no labels.
    #[error("label load failed for {}: {message}", .path.display())]
    LabelLoad {
        /// Path of the label file that failed to load.
        path: PathBuf,
        /// What went wrong.
        message: String,
        /// The underlying error, if one was reported.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A GPU device was requested but no accelerator is available.
    #[error("accelerator unavailable: {message}")]
    Accelerator {
        /// What went wrong.
        message: String,
        /// The underlying error, if one was reported.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A tensor did not match the shape the model declares.
    #[error("tensor shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// The shape the model declares.
        expected: Vec<usize>,
        /// The shape that was supplied or produced.
        actual: Vec<usize>,
    },

    /// The label table length does not match the model's class dimension.
    #[error("label count mismatch: {labels} labels for {classes} model outputs")]
    LabelCountMismatch {
        /// Number of entries in the label table.
        labels: usize,
        /// Class dimension declared by the model's output tensor.
        classes: usize,
    },

    /// An image could not be decoded.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// An operation was attempted after the session was closed.
    #[error("session is closed")]
    SessionClosed,

    /// The forward pass failed inside the inference engine.
    #[error("inference")]
    Inference(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A configuration parameter was invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// A message describing the invalid parameter.
        message: String,
    },

    /// Error from tensor reshaping.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Convenient result alias for classification operations.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

impl ClassifyError {
    /// Creates a model load error with context.
    pub fn model_load(
        path: &Path,
        message: impl Into<String>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        Self::ModelLoad {
            path: path.to_path_buf(),
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Creates a label load error with context.
    pub fn label_load(
        path: &Path,
        message: impl Into<String>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        Self::LabelLoad {
            path: path.to_path_buf(),
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Creates an accelerator error with context.
    pub fn accelerator(
        message: impl Into<String>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        Self::Accelerator {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Creates a shape mismatch error from the expected and actual shapes.
    pub fn shape_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Creates an inference error wrapping the engine's error.
    pub fn inference(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Inference(Box::new(error))
    }

    /// Creates an inference error from a plain message.
    pub fn inference_message(message: impl Into<String>) -> Self {
        Self::Inference(Box::new(SimpleError::new(message)))
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

impl From<image::ImageError> for ClassifyError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}

/// A minimal string-backed error used where no richer source exists.
#[derive(Debug)]
pub struct SimpleError {
    message: String,
}

impl SimpleError {
    /// Creates a new simple error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SimpleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_reports_both_shapes() {
        let err = ClassifyError::shape_mismatch(&[1, 224, 224, 3], &[1, 380, 380, 3]);
        let text = err.to_string();
        assert!(text.contains("[1, 224, 224, 3]"));
        assert!(text.contains("[1, 380, 380, 3]"));
    }

    #[test]
    fn label_count_mismatch_message() {
        let err = ClassifyError::LabelCountMismatch {
            labels: 964,
            classes: 965,
        };
        assert_eq!(
            err.to_string(),
            "label count mismatch: 964 labels for 965 model outputs"
        );
    }

    #[test]
    fn model_load_without_source() {
        let err = ClassifyError::model_load(
            Path::new("model-enb4.onnx"),
            "file not found",
            None::<std::io::Error>,
        );
        assert!(err.to_string().contains("model-enb4.onnx"));
    }
}
