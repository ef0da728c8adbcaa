//! # birdie-classify
//!
//! A Rust library that classifies bird photographs against a fixed label set
//! using a pre-trained ONNX model, returning a ranked shortlist of the most
//! probable labels with confidence scores. Built for on-device, low-latency
//! inference on CPU or GPU.
//!
//! ## Features
//!
//! - Deterministic image preprocessing (crop-or-pad, nearest-neighbor
//!   resize, affine normalization)
//! - ONNX Runtime integration for fast inference
//! - Bounded top-k selection with a reproducible tie-break
//! - Explicit open/close resource lifecycle
//! - Model variants as plain configuration data
//!
//! ## Modules
//!
//! * [`core`] - errors, configuration, session, labels, results
//! * [`processors`] - the numeric pipeline stages
//! * [`classifier`] - orchestration and model variants
//! * [`utils`] - image loading helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use birdie_classify::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = ClassifierBuilder::new()
//!     .device(Device::Cpu)
//!     .num_threads(4)
//!     .build(Path::new("assets"))?;
//!
//! let results = classifier.classify(Path::new("photos/robin.jpg"))?;
//! for recognition in &results {
//!     println!("{recognition}");
//! }
//!
//! classifier.close();
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod core;
pub mod processors;
pub mod utils;

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and
/// formatting layer. It's typically called at the start of an application to
/// enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use birdie_classify::prelude::*;
/// ```
pub mod prelude {
    pub use crate::classifier::variants::{ModelSpec, efficientnet_b4};
    pub use crate::classifier::{Classifier, ClassifierBuilder, ClassifierConfig, MAX_RESULTS};
    pub use crate::core::{
        ClassificationOutput, ClassifyError, ClassifyResult, Device, Orientation, Recognition,
    };
    pub use crate::utils::load_image;
}
