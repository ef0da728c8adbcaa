//! Bird Photo Classification Example
//!
//! This example classifies one or more photos against the shipped model and
//! prints the ranked results.
//!
//! Usage:
//! ```
//! cargo run --example classify -- --asset-dir <dir_with_model_and_labels> <image_paths>...
//! ```

use birdie_classify::init_tracing;
use birdie_classify::prelude::*;
use clap::Parser;
use std::path::Path;
use tracing::{error, info};

/// Command-line arguments for the classification example
#[derive(Parser)]
#[command(name = "classify")]
#[command(about = "Bird Photo Classification Example - ranks labels for each photo")]
struct Args {
    /// Directory containing the model and label files
    #[arg(short, long)]
    asset_dir: String,

    /// Image file paths to classify
    #[arg(required = true)]
    images: Vec<String>,

    /// Run on the GPU instead of the CPU
    #[arg(long)]
    gpu: bool,

    /// Number of CPU threads for inference
    #[arg(short, long, default_value_t = 4)]
    num_threads: usize,

    /// Number of ranked results to print per image
    #[arg(short, long, default_value_t = 5)]
    top: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = Args::parse();

    let device = if args.gpu { Device::Gpu } else { Device::Cpu };
    let classifier = ClassifierBuilder::new()
        .device(device)
        .num_threads(args.num_threads)
        .max_results(args.top)
        .build(Path::new(&args.asset_dir))?;

    info!(
        "model input size: {}x{}",
        classifier.input_width(),
        classifier.input_height()
    );

    for (i, image_path) in args.images.iter().enumerate() {
        info!("{}. {}", i + 1, image_path);
        match classifier.classify(Path::new(image_path)) {
            Ok(results) => {
                for recognition in &results {
                    info!("   {recognition}");
                }
            }
            Err(e) => {
                error!("classification failed for {}: {}", image_path, e);
                continue;
            }
        }
    }

    classifier.close();
    Ok(())
}
