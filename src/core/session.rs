//! ONNX Runtime session lifecycle and the synchronous forward pass.
//!
//! The session exclusively owns the loaded model and, when a GPU is
//! configured, the accelerator handle. Both live behind `Mutex<Option<..>>`:
//! the mutex because the runtime's `run` needs exclusive access, the option
//! so `close` can release everything early and idempotently. `Drop` is the
//! backstop for callers that never close.

use std::path::Path;
use std::sync::Mutex;

use ndarray::ArrayView2;
use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};
use ort::logging::LogLevel;
use ort::session::Session;
use ort::value::{TensorRef, ValueType};
use tracing::debug;

use crate::core::config::{Device, SessionOptions};
use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::core::tensor::{Tensor2D, Tensor4D, input_shape};

/// A loaded model with a fixed `{1, H, W, 3}` input and `{1, C}` output.
///
/// Opened once per classifier; `run` maps one input tensor to one output
/// tensor, synchronously and without retries. The input size and class count
/// discovered at open time drive the preprocessor and the label table check.
pub struct InferenceSession {
    session: Mutex<Option<Session>>,
    input_name: String,
    output_name: String,
    input_width: u32,
    input_height: u32,
    num_classes: usize,
}

impl std::fmt::Debug for InferenceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceSession")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("input_width", &self.input_width)
            .field("input_height", &self.input_height)
            .field("num_classes", &self.num_classes)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl InferenceSession {
    /// Opens a session for the model at `model_path`.
    ///
    /// A GPU device must actually be available: the accelerator is registered
    /// with error-on-failure and there is no CPU fallback. The thread count
    /// only configures CPU execution; an accelerator owns its own
    /// parallelism.
    ///
    /// # Errors
    ///
    /// * `Accelerator` if `device == Gpu` and no accelerator is usable.
    /// * `ModelLoad` if the model cannot be parsed or does not declare a
    ///   fixed `{1, H, W, 3}` input and a `{1, C}` output.
    pub fn open(model_path: &Path, options: &SessionOptions) -> ClassifyResult<Self> {
        options.validate()?;

        let mut builder = Session::builder()
            .and_then(|b| b.with_log_level(LogLevel::Error))
            .map_err(|e| {
                ClassifyError::model_load(model_path, "failed to create session builder", Some(e))
            })?;

        builder = match options.device {
            Device::Gpu => {
                let cuda = CUDAExecutionProvider::default();
                match cuda.is_available() {
                    Ok(true) => {}
                    Ok(false) => {
                        return Err(ClassifyError::accelerator(
                            "CUDA execution provider is not available",
                            None::<ort::Error>,
                        ));
                    }
                    Err(e) => {
                        return Err(ClassifyError::accelerator(
                            "failed to query CUDA availability",
                            Some(e),
                        ));
                    }
                }
                builder
                    .with_execution_providers([cuda.build().error_on_failure()])
                    .map_err(|e| {
                        ClassifyError::accelerator(
                            "failed to register CUDA execution provider",
                            Some(e),
                        )
                    })?
            }
            Device::Cpu => builder.with_intra_threads(options.num_threads).map_err(|e| {
                ClassifyError::model_load(
                    model_path,
                    "failed to configure intra-op threads",
                    Some(e),
                )
            })?,
        };

        let session = builder.commit_from_file(model_path).map_err(|e| {
            ClassifyError::model_load(model_path, "failed to create session", Some(e))
        })?;

        let input = session.inputs.first().ok_or_else(|| {
            ClassifyError::model_load(model_path, "model declares no inputs", None::<ort::Error>)
        })?;
        let input_name = input.name.clone();
        let input_dims = tensor_dims(&input.input_type).ok_or_else(|| {
            ClassifyError::model_load(
                model_path,
                "model input is not a tensor",
                None::<ort::Error>,
            )
        })?;
        let (input_height, input_width) = validate_input_dims(&input_dims)
            .map_err(|message| ClassifyError::model_load(model_path, message, None::<ort::Error>))?;

        let output = session.outputs.first().ok_or_else(|| {
            ClassifyError::model_load(model_path, "model declares no outputs", None::<ort::Error>)
        })?;
        let output_name = output.name.clone();
        let output_dims = tensor_dims(&output.output_type).ok_or_else(|| {
            ClassifyError::model_load(
                model_path,
                "model output is not a tensor",
                None::<ort::Error>,
            )
        })?;
        let num_classes = validate_output_dims(&output_dims)
            .map_err(|message| ClassifyError::model_load(model_path, message, None::<ort::Error>))?;

        debug!(
            model = %model_path.display(),
            device = ?options.device,
            input_width,
            input_height,
            num_classes,
            "opened inference session"
        );

        Ok(Self {
            session: Mutex::new(Some(session)),
            input_name,
            output_name,
            input_width,
            input_height,
            num_classes,
        })
    }

    /// Runs the forward pass on one input tensor.
    ///
    /// # Errors
    ///
    /// * `ShapeMismatch` if the input does not match the declared signature.
    /// * `SessionClosed` if [`close`](Self::close) was already called.
    /// * `Inference` if the engine fails; the error is surfaced untouched.
    pub fn run(&self, input: &Tensor4D) -> ClassifyResult<Tensor2D> {
        let expected = input_shape(self.input_height as usize, self.input_width as usize);
        if input.shape() != expected {
            return Err(ClassifyError::shape_mismatch(&expected, input.shape()));
        }

        let mut guard = self
            .session
            .lock()
            .map_err(|_| ClassifyError::inference_message("session lock poisoned"))?;
        let session = guard.as_mut().ok_or(ClassifyError::SessionClosed)?;

        let input_tensor =
            TensorRef::from_array_view(input.view()).map_err(ClassifyError::inference)?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(ClassifyError::inference)?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(ClassifyError::inference)?;

        let expected_out = [1, self.num_classes];
        let actual: Vec<usize> = output_shape.iter().map(|&d| d.max(0) as usize).collect();
        if actual != expected_out || output_data.len() != self.num_classes {
            return Err(ClassifyError::shape_mismatch(&expected_out, &actual));
        }

        let view = ArrayView2::from_shape((1, self.num_classes), output_data)?;
        Ok(view.to_owned())
    }

    /// Releases the accelerator handle and the model.
    ///
    /// Safe to call repeatedly; later calls are no-ops. After closing, `run`
    /// fails with `SessionClosed`.
    pub fn close(&self) {
        if let Ok(mut guard) = self.session.lock() {
            if guard.take().is_some() {
                debug!("closed inference session");
            }
        }
    }

    /// Whether the session has been closed.
    pub fn is_closed(&self) -> bool {
        self.session.lock().map(|g| g.is_none()).unwrap_or(true)
    }

    /// Image width the model expects, in pixels.
    pub fn input_width(&self) -> u32 {
        self.input_width
    }

    /// Image height the model expects, in pixels.
    pub fn input_height(&self) -> u32 {
        self.input_height
    }

    /// Class dimension of the output tensor.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}

/// Extracts the dimension list from a tensor value type.
fn tensor_dims(value_type: &ValueType) -> Option<Vec<i64>> {
    match value_type {
        ValueType::Tensor { shape, .. } => Some(shape.iter().copied().collect()),
        _ => None,
    }
}

/// Checks a declared input shape against the `{1, H, W, 3}` contract.
fn validate_input_dims(dims: &[i64]) -> Result<(u32, u32), String> {
    if dims.len() != 4 || dims[0] != 1 || dims[3] != 3 || dims[1] <= 0 || dims[2] <= 0 {
        return Err(format!(
            "model input must be a fixed {{1, H, W, 3}} tensor, got {dims:?}"
        ));
    }
    Ok((dims[1] as u32, dims[2] as u32))
}

/// Checks a declared output shape against the `{1, C}` contract.
fn validate_output_dims(dims: &[i64]) -> Result<usize, String> {
    if dims.len() != 2 || dims[0] != 1 || dims[1] <= 0 {
        return Err(format!(
            "model output must be a fixed {{1, C}} tensor, got {dims:?}"
        ));
    }
    Ok(dims[1] as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nhwc_input_shapes_are_accepted() {
        assert_eq!(validate_input_dims(&[1, 380, 380, 3]), Ok((380, 380)));
        assert_eq!(validate_input_dims(&[1, 224, 320, 3]), Ok((224, 320)));
    }

    #[test]
    fn non_nhwc_input_shapes_are_rejected() {
        // NCHW layout, dynamic batch, wrong rank.
        assert!(validate_input_dims(&[1, 3, 224, 224]).is_err());
        assert!(validate_input_dims(&[-1, 224, 224, 3]).is_err());
        assert!(validate_input_dims(&[224, 224, 3]).is_err());
        assert!(validate_input_dims(&[1, -1, 224, 3]).is_err());
    }

    #[test]
    fn output_shapes_must_be_one_by_c() {
        assert_eq!(validate_output_dims(&[1, 965]), Ok(965));
        assert!(validate_output_dims(&[965]).is_err());
        assert!(validate_output_dims(&[2, 965]).is_err());
        assert!(validate_output_dims(&[1, -1]).is_err());
    }
}
