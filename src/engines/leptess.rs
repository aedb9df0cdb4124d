//! Leptess/Tesseract engine implementation
//!
//! Tesseract-based OCR engine, the same recognizer the timestamp workflow was
//! tuned against. Uses tesseract-static crate for static linking (no system
//! dependencies). Downloads tessdata (training data) automatically on first use
//! unless a tessdata directory is configured.

use crate::config::Config;
use crate::engine::{OcrEngine, OcrResult};
use crate::error::PipelineError;
use std::path::Path;
use tesseract_static::tesseract::Tesseract;

use super::{cache_dir, download_file};

/// Tesseract OCR Engine
pub struct LeptessEngine {
    /// Path to tessdata directory
    tessdata_path: String,
    /// Language for OCR
    language: String,
}

impl LeptessEngine {
    /// Create a new Tesseract-based OCR engine
    pub fn new(config: &Config) -> Result<Self, PipelineError> {
        let language = config.language.clone();

        let tessdata_path = match &config.tessdata_path {
            Some(path) => path.clone(),
            None => ensure_tessdata_available(&language)?,
        };

        // Validate that tessdata is accessible by doing a test initialization
        let test_tess = Tesseract::new(Some(&tessdata_path), Some(&language)).map_err(|e| {
            PipelineError::InitializationError(format!("Failed to initialize Tesseract: {}", e))
        })?;
        drop(test_tess);

        tracing::info!(
            "Leptess engine initialized (tessdata: {}, language: {})",
            tessdata_path,
            language
        );

        Ok(Self {
            tessdata_path,
            language,
        })
    }
}

impl OcrEngine for LeptessEngine {
    fn name(&self) -> &'static str {
        "leptess"
    }

    fn description(&self) -> &'static str {
        "Tesseract OCR engine - statically linked, downloads tessdata on first use"
    }

    fn process(&self, path: &Path) -> Result<OcrResult, PipelineError> {
        let img = image::open(path).map_err(|e| {
            PipelineError::ProcessingError(format!(
                "Failed to load image {}: {}",
                path.display(),
                e
            ))
        })?;
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        // BMP is always supported by leptonica
        let mut bmp_data = Vec::new();
        rgb_img
            .write_to(&mut std::io::Cursor::new(&mut bmp_data), image::ImageFormat::Bmp)
            .map_err(|e| {
                PipelineError::ProcessingError(format!("Failed to convert to BMP: {}", e))
            })?;

        tracing::debug!(
            "Processing image: {}x{}, BMP size: {} bytes",
            width,
            height,
            bmp_data.len()
        );

        let mut tess = Tesseract::new(Some(&self.tessdata_path), Some(&self.language))
            .map_err(|e| {
                PipelineError::ProcessingError(format!("Failed to create Tesseract: {}", e))
            })?;

        tess = tess.set_image_from_mem(&bmp_data).map_err(|e| {
            PipelineError::ProcessingError(format!(
                "Failed to set image ({}x{}, {} bytes): {}",
                width,
                height,
                bmp_data.len(),
                e
            ))
        })?;

        tess = tess.recognize().map_err(|e| {
            PipelineError::ProcessingError(format!("Failed to recognize text: {}", e))
        })?;

        // Untrimmed: the trailing newline and form feed are the sanitizer's job
        let text = tess
            .get_text()
            .map_err(|e| PipelineError::ProcessingError(format!("Failed to get text: {}", e)))?;

        // 0-100 scale
        let confidence = tess.mean_text_conf() as f32 / 100.0;

        Ok(OcrResult {
            text,
            confidence,
            warnings: Vec::new(),
        })
    }
}

/// Ensure tessdata is available, downloading if needed
fn ensure_tessdata_available(language: &str) -> Result<String, PipelineError> {
    let tessdata_dir = cache_dir()?.join("tessdata");

    std::fs::create_dir_all(&tessdata_dir).map_err(|e| {
        PipelineError::InitializationError(format!("Failed to create tessdata directory: {}", e))
    })?;

    let traineddata_path = tessdata_dir.join(format!("{}.traineddata", language));

    if !traineddata_path.exists() {
        tracing::info!(
            "Downloading tessdata for '{}' (this may take a moment)...",
            language
        );
        download_file(&tessdata_url(language), &traineddata_path)?;
        tracing::info!("Downloaded tessdata to {:?}", traineddata_path);
    } else {
        tracing::debug!("Using cached tessdata from {:?}", tessdata_dir);
    }

    // Tesseract expects the directory, not the file
    tessdata_dir
        .to_str()
        .map(|s| s.to_string())
        .ok_or_else(|| PipelineError::InitializationError("Invalid tessdata path".to_string()))
}

/// Get tessdata download URL for a language
fn tessdata_url(language: &str) -> String {
    // tessdata_fast for smaller, faster downloads
    format!(
        "https://github.com/tesseract-ocr/tessdata_fast/raw/main/{}.traineddata",
        language
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tessdata_url_points_at_language_file() {
        assert_eq!(
            tessdata_url("deu"),
            "https://github.com/tesseract-ocr/tessdata_fast/raw/main/deu.traineddata"
        );
    }
}
