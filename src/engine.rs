use crate::error::PipelineError;
use std::path::Path;

/// OCR processing result
#[derive(Debug, Clone)]
pub struct OcrResult {
    /// Raw recognized text, untrimmed
    pub text: String,
    pub confidence: f32,
    pub warnings: Vec<String>,
}

/// Trait that all OCR engines must implement
pub trait OcrEngine {
    /// Returns the engine identifier (e.g., "ocrs", "leptess")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Recognize the text in an image file
    fn process(&self, path: &Path) -> Result<OcrResult, PipelineError>;
}
