//! Utility functions shared across the pipeline.

pub mod image;

pub use image::{create_rgb_image, load_image};
