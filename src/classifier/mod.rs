//! The image classifier orchestrating the full pipeline.
//!
//! One classifier owns one inference session and the processing stages built
//! around it. Construction is all-or-nothing: the model, the label table and
//! the session must all load, and the label count must match the model's
//! class dimension, or the caller gets an error and no object. After
//! construction the classifier is `Open`; `close` moves it to `Closed`
//! (terminal), after which `classify` fails with `SessionClosed`.

pub mod variants;

use std::path::Path;
use std::time::Instant;

use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::{Device, Orientation, OrientationProvider, SessionOptions};
use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::core::labels::LabelTable;
use crate::core::predictions::{ClassificationOutput, Recognition};
use crate::core::session::InferenceSession;
use crate::processors::postprocess::Postprocessor;
use crate::processors::preprocess::ImagePreprocessor;
use crate::processors::topk::TopKSelector;
use crate::utils::image::load_image;
use self::variants::ModelSpec;

/// Number of ranked results a classification returns at most.
pub const MAX_RESULTS: usize = 20;

/// Configuration for building a [`Classifier`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// The model variant to load.
    pub variant: ModelSpec,
    /// Device executing the forward pass.
    pub device: Device,
    /// CPU threads for intra-op parallelism. Must be at least 1.
    pub num_threads: usize,
    /// Result budget for the top-k selection. Must be at least 1.
    pub max_results: usize,
    /// Rotation applied before cropping. `Deg0` unless the host opts into
    /// orientation-aware cropping.
    pub orientation: Orientation,
}

impl ClassifierConfig {
    /// Creates a configuration with the shipped variant and default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the thread count or result budget is zero,
    /// or if either normalization pair is unusable.
    pub fn validate(&self) -> ClassifyResult<()> {
        if self.num_threads == 0 {
            return Err(ClassifyError::invalid_config(
                "num_threads must be at least 1",
            ));
        }
        if self.max_results == 0 {
            return Err(ClassifyError::invalid_config(
                "max_results must be at least 1",
            ));
        }
        self.variant.input_normalization()?;
        self.variant.output_normalization()?;
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            variant: variants::efficientnet_b4(),
            device: Device::Cpu,
            num_threads: 1,
            max_results: MAX_RESULTS,
            orientation: Orientation::Deg0,
        }
    }
}

/// Classifies photographs against the variant's fixed label set.
///
/// `classify` is synchronous and blocking. The classifier exclusively owns
/// its session: concurrent `classify` calls on one instance, or `close`
/// racing an in-flight call, are not supported and must be serialized by the
/// caller.
#[derive(Debug)]
pub struct Classifier {
    session: InferenceSession,
    labels: LabelTable,
    preprocessor: ImagePreprocessor,
    postprocessor: Postprocessor,
    selector: TopKSelector,
}

impl Classifier {
    /// Builds a classifier from a configuration and an asset directory.
    ///
    /// Opens the session, loads the label table and validates it against the
    /// model's class dimension. Any failure aborts construction; there is no
    /// partially usable classifier.
    pub fn new(config: ClassifierConfig, asset_dir: &Path) -> ClassifyResult<Self> {
        config.validate()?;

        let session = InferenceSession::open(
            &config.variant.model_path(asset_dir),
            &SessionOptions::new(config.device, config.num_threads),
        )?;
        let labels = LabelTable::load(&config.variant.label_path(asset_dir))?;
        labels.validate_class_count(session.num_classes())?;

        let preprocessor = ImagePreprocessor::new(
            session.input_width(),
            session.input_height(),
            config.variant.input_normalization()?,
        )?
        .with_orientation(config.orientation);
        let postprocessor = Postprocessor::new(config.variant.output_normalization()?);
        let selector = TopKSelector::new(config.max_results)?;

        debug!(
            labels = labels.len(),
            max_results = selector.max_results(),
            "created image classifier"
        );

        Ok(Self {
            session,
            labels,
            preprocessor,
            postprocessor,
            selector,
        })
    }

    /// Classifies the image at `path` and returns the ranked results.
    ///
    /// Per-call failures (`ImageLoad`, `ShapeMismatch`, `Inference`) leave
    /// the classifier open and reusable for subsequent calls.
    ///
    /// # Errors
    ///
    /// `SessionClosed` if [`close`](Self::close) was called; otherwise the
    /// first failure of image decode, preprocessing, inference or
    /// post-processing.
    pub fn classify(&self, path: &Path) -> ClassifyResult<Vec<Recognition>> {
        if self.session.is_closed() {
            return Err(ClassifyError::SessionClosed);
        }

        let started = Instant::now();
        let image = load_image(path)?;
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            path = %path.display(),
            "loaded image"
        );

        self.classify_image(&image)
    }

    /// Classifies an already-decoded bitmap.
    ///
    /// Same contract as [`classify`](Self::classify), for hosts that hand
    /// over raw pixels instead of a file path.
    pub fn classify_image(&self, image: &RgbImage) -> ClassifyResult<Vec<Recognition>> {
        if self.session.is_closed() {
            return Err(ClassifyError::SessionClosed);
        }

        let input = self.preprocessor.run(image)?;

        let started = Instant::now();
        let output = self.session.run(&input)?;
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "ran model inference"
        );

        let probabilities = self.postprocessor.run(&output)?;
        Ok(self.selector.select(&self.labels, &probabilities))
    }

    /// Classifies the image at `path` into the parallel-array output form.
    pub fn classify_output(&self, path: &Path) -> ClassifyResult<ClassificationOutput> {
        Ok(ClassificationOutput::from(self.classify(path)?.as_slice()))
    }

    /// Releases the session and its resources.
    ///
    /// Idempotent; later `classify` calls fail with `SessionClosed`.
    pub fn close(&self) {
        self.session.close();
    }

    /// Whether the classifier has been closed.
    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }

    /// Image width the model expects, in pixels.
    pub fn input_width(&self) -> u32 {
        self.session.input_width()
    }

    /// Image height the model expects, in pixels.
    pub fn input_height(&self) -> u32 {
        self.session.input_height()
    }
}

/// Builder for a [`Classifier`].
pub struct ClassifierBuilder {
    config: ClassifierConfig,
}

impl ClassifierBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: ClassifierConfig::default(),
        }
    }

    /// Sets the model variant.
    pub fn variant(mut self, variant: ModelSpec) -> Self {
        self.config.variant = variant;
        self
    }

    /// Sets the device executing the forward pass.
    pub fn device(mut self, device: Device) -> Self {
        self.config.device = device;
        self
    }

    /// Sets the CPU thread count.
    pub fn num_threads(mut self, num_threads: usize) -> Self {
        self.config.num_threads = num_threads;
        self
    }

    /// Sets the result budget for top-k selection.
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.config.max_results = max_results;
        self
    }

    /// Sets a fixed rotation applied before cropping.
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.config.orientation = orientation;
        self
    }

    /// Reads the rotation once from a host orientation hook.
    pub fn orientation_from(mut self, provider: &dyn OrientationProvider) -> Self {
        self.config.orientation = provider.rotation();
        self
    }

    /// Builds the classifier against the given asset directory.
    pub fn build(self, asset_dir: &Path) -> ClassifyResult<Classifier> {
        Classifier::new(self.config, asset_dir)
    }
}

impl Default for ClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ClassifierConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_results, 20);
        assert_eq!(config.device, Device::Cpu);
    }

    #[test]
    fn zero_threads_fails_validation() {
        let config = ClassifierConfig {
            num_threads: 0,
            ..ClassifierConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ClassifyError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn zero_result_budget_fails_validation() {
        let config = ClassifierConfig {
            max_results: 0,
            ..ClassifierConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn broken_variant_normalization_fails_validation() {
        let mut config = ClassifierConfig::default();
        config.variant.input_std = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn builder_threads_orientation_hook() {
        struct UpsideDown;
        impl OrientationProvider for UpsideDown {
            fn rotation(&self) -> Orientation {
                Orientation::Deg180
            }
        }

        let builder = ClassifierBuilder::new()
            .num_threads(4)
            .max_results(5)
            .orientation_from(&UpsideDown);
        assert_eq!(builder.config.num_threads, 4);
        assert_eq!(builder.config.max_results, 5);
        assert_eq!(builder.config.orientation, Orientation::Deg180);
    }

    #[test]
    fn construction_fails_when_model_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = ClassifierBuilder::new().build(dir.path());
        assert!(matches!(result, Err(ClassifyError::ModelLoad { .. })));
    }
}
