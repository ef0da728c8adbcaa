//! Core building blocks of the classification pipeline.
//!
//! This module contains the pieces every request flows through:
//! - Error handling
//! - Session and device configuration
//! - The inference session wrapping the runtime
//! - The label table
//! - Result types
//! - Tensor aliases
//!
//! It also re-exports the commonly used types for convenience.

pub mod config;
pub mod errors;
pub mod labels;
pub mod predictions;
pub mod session;
pub mod tensor;

pub use config::{Device, Orientation, OrientationProvider, SessionOptions};
pub use errors::{ClassifyError, ClassifyResult};
pub use labels::LabelTable;
pub use predictions::{ClassificationOutput, Recognition, Region};
pub use session::InferenceSession;
pub use tensor::{INPUT_CHANNELS, Tensor2D, Tensor4D};
