//! OCRS engine implementation
//!
//! Pure Rust OCR engine using the ocrs library. No system dependencies required.
//! Downloads neural network models automatically on first use.

use crate::config::Config;
use crate::engine::{OcrEngine, OcrResult};
use crate::error::PipelineError;
use ocrs::{DecodeMethod, ImageSource, OcrEngine as OcrsOcrEngine, OcrEngineParams};
use rten::Model;
use std::path::Path;

use super::{cache_dir, download_file};

/// Default model URLs from the ocrs project
const DETECTION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-detection.rten";
const RECOGNITION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-recognition.rten";

/// OCR Engine wrapping the ocrs library
pub struct OcrsEngine {
    engine: OcrsOcrEngine,
}

impl OcrsEngine {
    /// Create a new OCR engine, downloading models if needed
    pub fn new(_config: &Config) -> Result<Self, PipelineError> {
        tracing::info!("Initializing ocrs OCR engine...");

        let detection_model_path =
            ensure_model_downloaded(DETECTION_MODEL_URL, "text-detection.rten")?;
        let recognition_model_path =
            ensure_model_downloaded(RECOGNITION_MODEL_URL, "text-recognition.rten")?;

        let detection_model = Model::load_file(&detection_model_path).map_err(|e| {
            PipelineError::InitializationError(format!("Failed to load detection model: {}", e))
        })?;
        let recognition_model = Model::load_file(&recognition_model_path).map_err(|e| {
            PipelineError::InitializationError(format!("Failed to load recognition model: {}", e))
        })?;

        let engine = OcrsOcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            decode_method: DecodeMethod::Greedy,
            ..Default::default()
        })
        .map_err(|e| {
            PipelineError::InitializationError(format!("Failed to create OCR engine: {}", e))
        })?;

        tracing::info!("ocrs engine initialized successfully");

        Ok(Self { engine })
    }
}

impl OcrEngine for OcrsEngine {
    fn name(&self) -> &'static str {
        "ocrs"
    }

    fn description(&self) -> &'static str {
        "Pure Rust OCR engine - fast, no system dependencies"
    }

    fn process(&self, path: &Path) -> Result<OcrResult, PipelineError> {
        let img = image::open(path).map_err(|e| {
            PipelineError::ProcessingError(format!(
                "Failed to load image {}: {}",
                path.display(),
                e
            ))
        })?;

        // HWC layout, which is what ImageSource::from_bytes expects
        let rgb_img = img.into_rgb8();
        let dimensions = rgb_img.dimensions();

        let img_source = ImageSource::from_bytes(rgb_img.as_raw(), dimensions).map_err(|e| {
            PipelineError::ProcessingError(format!("Failed to create image source: {}", e))
        })?;

        let ocr_input = self.engine.prepare_input(img_source).map_err(|e| {
            PipelineError::ProcessingError(format!("Failed to prepare input: {}", e))
        })?;

        let word_rects = self.engine.detect_words(&ocr_input).map_err(|e| {
            PipelineError::ProcessingError(format!("Failed to detect words: {}", e))
        })?;

        let line_rects = self.engine.find_text_lines(&ocr_input, &word_rects);

        let line_texts = self
            .engine
            .recognize_text(&ocr_input, &line_rects)
            .map_err(|e| {
                PipelineError::ProcessingError(format!("Failed to recognize text: {}", e))
            })?;

        let text: String = line_texts
            .iter()
            .filter_map(|line| line.as_ref())
            .map(|line| {
                line.words()
                    .map(|word| word.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n");

        let confidence = timestamp_confidence(&text);

        Ok(OcrResult {
            text,
            confidence,
            warnings: Vec::new(),
        })
    }
}

/// Share of characters that can appear in a timestamp (digits and separators)
///
/// ocrs reports no per-line score, so this stands in for one.
fn timestamp_confidence(text: &str) -> f32 {
    let chars: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.is_empty() {
        return 0.0;
    }

    let plausible = chars
        .iter()
        .filter(|c| c.is_ascii_digit() || matches!(c, ':' | '/' | '-' | '.'))
        .count();

    plausible as f32 / chars.len() as f32
}

fn ensure_model_downloaded(url: &str, filename: &str) -> Result<std::path::PathBuf, PipelineError> {
    let cache_dir = cache_dir()?;
    let model_path = cache_dir.join(filename);

    if !model_path.exists() {
        tracing::info!("Downloading {} (this may take a moment)...", filename);
        download_file(url, &model_path)?;
        tracing::info!("Downloaded {} to {:?}", filename, model_path);
    } else {
        tracing::debug!("Using cached model from {:?}", model_path);
    }

    Ok(model_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_returns_zero() {
        assert_eq!(timestamp_confidence(""), 0.0);
        assert_eq!(timestamp_confidence(" \n "), 0.0);
    }

    #[test]
    fn test_clean_timestamp_full_confidence() {
        assert_eq!(timestamp_confidence("12/05/2023 10:30:00"), 1.0);
    }

    #[test]
    fn test_noise_lowers_confidence() {
        let confidence = timestamp_confidence("Hello World");
        assert_eq!(confidence, 0.0);

        let confidence = timestamp_confidence("12/05/2023 |O:3O:00");
        assert!(confidence < 1.0, "Expected < 1.0, got {}", confidence);
        assert!(confidence > 0.5, "Expected > 0.5, got {}", confidence);
    }
}
