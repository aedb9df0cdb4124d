//! OCR engine implementations
//!
//! This module contains implementations of the OcrEngine trait for different
//! OCR backends. Engines are conditionally compiled based on feature flags.

#[cfg(feature = "engine-ocrs")]
pub mod ocrs;

#[cfg(feature = "engine-leptess")]
pub mod leptess;

use crate::config::Config;
use crate::engine::OcrEngine;
use crate::error::PipelineError;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Names of the engines compiled into this binary, default first
pub fn available() -> Vec<&'static str> {
    #[allow(unused_mut)]
    let mut names = Vec::new();

    #[cfg(feature = "engine-ocrs")]
    names.push("ocrs");

    #[cfg(feature = "engine-leptess")]
    names.push("leptess");

    names
}

/// Initialize the engine named in the config, or the default one
pub fn build(config: &Config) -> Result<Box<dyn OcrEngine>, PipelineError> {
    let available = available();

    let name = match &config.engine {
        Some(name) => name.as_str(),
        None => available.first().copied().ok_or_else(|| {
            PipelineError::InitializationError(
                "No OCR engines available. Build with --features engine-ocrs or --features engine-leptess".to_string(),
            )
        })?,
    };

    tracing::info!("Initializing {} engine...", name);

    match name {
        #[cfg(feature = "engine-ocrs")]
        "ocrs" => Ok(Box::new(ocrs::OcrsEngine::new(config)?)),

        #[cfg(feature = "engine-leptess")]
        "leptess" => Ok(Box::new(leptess::LeptessEngine::new(config)?)),

        other => Err(PipelineError::InitializationError(format!(
            "Unknown OCR engine '{}' (available: {})",
            other,
            available.join(", ")
        ))),
    }
}

/// Per-user cache directory for downloaded models
#[allow(dead_code)]
fn cache_dir() -> Result<PathBuf, PipelineError> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(env!("CARGO_PKG_NAME"));

    std::fs::create_dir_all(&cache_dir).map_err(|e| {
        PipelineError::InitializationError(format!("Failed to create cache directory: {}", e))
    })?;

    Ok(cache_dir)
}

/// Download a file from URL to path using ureq
#[allow(dead_code)]
fn download_file(url: &str, path: &Path) -> Result<(), PipelineError> {
    let response = ureq::get(url).call().map_err(|e| {
        PipelineError::InitializationError(format!("Failed to download {}: {}", url, e))
    })?;

    let buffer = response.into_body().read_to_vec().map_err(|e| {
        PipelineError::InitializationError(format!("Failed to read response from {}: {}", url, e))
    })?;

    // Only a complete download gets the final name
    let partial_path = path.with_extension("part");
    let mut file = File::create(&partial_path).map_err(|e| {
        PipelineError::InitializationError(format!("Failed to create {:?}: {}", partial_path, e))
    })?;
    file.write_all(&buffer).map_err(|e| {
        PipelineError::InitializationError(format!("Failed to write {:?}: {}", partial_path, e))
    })?;
    std::fs::rename(&partial_path, path).map_err(|e| {
        PipelineError::InitializationError(format!("Failed to move {:?} into place: {}", path, e))
    })?;

    Ok(())
}
