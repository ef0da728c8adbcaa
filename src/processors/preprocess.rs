//! Image-to-tensor preprocessing.
//!
//! Converts an arbitrary-size decoded image into the model's input tensor
//! with a fixed sequence of deterministic transforms. The order is part of
//! the contract: crop-or-pad to the canonical square, nearest-neighbor resize
//! to the model input size, then normalize. Reordering these changes the
//! numbers the model sees.

use std::borrow::Cow;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use crate::core::config::Orientation;
use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::core::tensor::{INPUT_CHANNELS, Tensor4D, input_shape};
use crate::processors::normalization::NormalizeOp;

/// Side length of the canonical square an undersized image is padded to.
///
/// Images whose short side is at least this are center-cropped to their own
/// short side instead; the canonical size is independent of the model's input
/// size.
pub const REFERENCE_SIDE: u32 = 512;

/// Fill color for the pad path.
const PAD_FILL: Rgb<u8> = Rgb([0, 0, 0]);

/// Deterministic image-to-tensor preprocessor.
///
/// Fixed transform order per run:
/// 1. rotate by the configured orientation (identity by default),
/// 2. crop-or-pad to the canonical square,
/// 3. nearest-neighbor resize to the model input size (a deliberate
///    speed/quality tradeoff over bilinear),
/// 4. elementwise input normalization.
///
/// The same image and configuration always produce a bit-identical tensor.
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    target_width: u32,
    target_height: u32,
    normalize: NormalizeOp,
    orientation: Orientation,
}

impl ImagePreprocessor {
    /// Creates a preprocessor for the given model input size.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either target dimension is zero.
    pub fn new(
        target_width: u32,
        target_height: u32,
        normalize: NormalizeOp,
    ) -> ClassifyResult<Self> {
        if target_width == 0 || target_height == 0 {
            return Err(ClassifyError::invalid_config(format!(
                "preprocessor target size must be non-zero, got {target_width}x{target_height}"
            )));
        }
        Ok(Self {
            target_width,
            target_height,
            normalize,
            orientation: Orientation::Deg0,
        })
    }

    /// Sets the rotation applied before cropping.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Model input width this preprocessor produces.
    pub fn target_width(&self) -> u32 {
        self.target_width
    }

    /// Model input height this preprocessor produces.
    pub fn target_height(&self) -> u32 {
        self.target_height
    }

    /// Converts a decoded image into a `{1, H, W, 3}` input tensor.
    pub fn run(&self, image: &RgbImage) -> ClassifyResult<Tensor4D> {
        let rotated: Cow<'_, RgbImage> = match self.orientation {
            Orientation::Deg0 => Cow::Borrowed(image),
            Orientation::Deg90 => Cow::Owned(imageops::rotate90(image)),
            Orientation::Deg180 => Cow::Owned(imageops::rotate180(image)),
            Orientation::Deg270 => Cow::Owned(imageops::rotate270(image)),
        };

        let square = canonical_square(&rotated);
        let resized = imageops::resize(
            &square,
            self.target_width,
            self.target_height,
            FilterType::Nearest,
        );

        let height = self.target_height as usize;
        let width = self.target_width as usize;
        let mut data = Vec::with_capacity(height * width * INPUT_CHANNELS);
        for pixel in resized.pixels() {
            for channel in 0..INPUT_CHANNELS {
                data.push(self.normalize.apply(f32::from(pixel[channel])));
            }
        }

        let shape = input_shape(height, width);
        Ok(Tensor4D::from_shape_vec(
            (shape[0], shape[1], shape[2], shape[3]),
            data,
        )?)
    }
}

/// Crops or pads an image to its canonical square.
///
/// If the short side is at least [`REFERENCE_SIDE`], the result is a centered
/// `min(w, h)` square crop. Otherwise the result is a `REFERENCE_SIDE` square:
/// each dimension larger than the reference is center-cropped to it, each
/// smaller dimension is centered on the black fill.
fn canonical_square(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let side = width.min(height);

    if side >= REFERENCE_SIDE {
        if width == height {
            return image.clone();
        }
        let x = (width - side) / 2;
        let y = (height - side) / 2;
        return imageops::crop_imm(image, x, y, side, side).to_image();
    }

    let crop_width = width.min(REFERENCE_SIDE);
    let crop_height = height.min(REFERENCE_SIDE);
    let source_x = (width - crop_width) / 2;
    let source_y = (height - crop_height) / 2;
    let cropped = imageops::crop_imm(image, source_x, source_y, crop_width, crop_height).to_image();

    let mut canvas = RgbImage::from_pixel(REFERENCE_SIDE, REFERENCE_SIDE, PAD_FILL);
    let dest_x = i64::from((REFERENCE_SIDE - crop_width) / 2);
    let dest_y = i64::from((REFERENCE_SIDE - crop_height) / 2);
    imageops::replace(&mut canvas, &cropped, dest_x, dest_y);
    canvas
}
