use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod engine;
mod engines;
mod error;
mod preprocessing;
mod renamer;
mod sanitize;

use config::CollisionPolicy;
use preprocessing::steps::crop::CropRegion;

#[derive(Parser, Debug)]
#[command(name = "timestamp-renamer")]
#[command(about = "Crop, OCR and rename scanned timestamp images")]
#[command(version)]
pub struct Args {
    /// Path to the folder containing the images
    pub input_folder: PathBuf,

    /// Path to the folder where the renamed images will be saved
    pub output_folder: PathBuf,

    /// Timestamp overlay rectangle as LEFT,TOP,RIGHT,BOTTOM
    #[arg(long, default_value = "0,0,972,32")]
    pub crop: CropRegion,

    /// Horizontal scaling factor applied after cropping
    #[arg(long, default_value = "0.5")]
    pub scale_x: f32,

    /// Contrast enhancement factor
    #[arg(long, default_value = "2.0")]
    pub contrast: f32,

    /// White border added around the strip, in pixels
    #[arg(long, default_value = "10")]
    pub padding: u32,

    /// OCR engine to use (defaults to the first one compiled in)
    #[arg(long)]
    pub engine: Option<String>,

    /// Language for the Tesseract engine (e.g., "eng", "deu")
    #[arg(long, default_value = "eng")]
    pub language: String,

    /// Path to tessdata directory (downloaded into the cache if not set)
    #[arg(long, env = "TESSDATA_PREFIX")]
    pub tessdata_path: Option<String>,

    /// Strip surrounding whitespace from the recognized text
    #[arg(long)]
    pub trim: bool,

    /// What to do when two images produce the same name
    #[arg(long, value_enum, default_value_t = CollisionPolicy::Overwrite)]
    pub on_collision: CollisionPolicy,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if !args.input_folder.is_dir() {
        tracing::error!("Error: Input folder does not exist.");
        return Ok(ExitCode::from(1));
    }

    let config = config::Config::try_from(args)?;

    tracing::info!("Starting timestamp-renamer v{}", env!("CARGO_PKG_VERSION"));

    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| error::PipelineError::io(&config.output_dir, e))?;

    let engine = engines::build(&config)?;
    tracing::info!("Using {} engine: {}", engine.name(), engine.description());

    preprocessing::preprocess_dir(&config)?;
    let summary = renamer::extract_and_rename(&config, engine.as_ref())?;

    tracing::info!(
        "Renamed {} images into {}",
        summary.renamed.len(),
        config.output_dir.display()
    );

    Ok(ExitCode::SUCCESS)
}
