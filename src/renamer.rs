//! Text extraction and renaming stage
//!
//! OCRs each preprocessed strip in the scratch directory and copies the matching
//! original image into the output folder under the recognized timestamp. The
//! scratch directory is removed once every strip is handled.

use crate::config::{CollisionPolicy, Config, OUTPUT_EXTENSION};
use crate::engine::OcrEngine;
use crate::error::PipelineError;
use crate::sanitize::sanitize_label;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Below this the label is still used, but flagged in the log
const LOW_CONFIDENCE: f32 = 0.5;

/// Outcome of a renaming pass
#[derive(Debug, Default)]
pub struct RenameSummary {
    /// Output files written, in processing order
    pub renamed: Vec<PathBuf>,
}

/// Percentage of files already handled when file `index` (zero based) starts
pub fn progress_percent(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    index as f64 / total as f64 * 100.0
}

/// Destination for a label under the configured collision policy
pub fn output_path(output_dir: &Path, label: &str, policy: CollisionPolicy) -> PathBuf {
    let candidate = output_dir.join(format!("{}{}", label, OUTPUT_EXTENSION));
    if policy == CollisionPolicy::Overwrite || !candidate.exists() {
        return candidate;
    }

    (1u32..)
        .map(|n| output_dir.join(format!("{}_{}{}", label, n, OUTPUT_EXTENSION)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Sorted filenames of the regular files in the scratch directory
fn scratch_images(temp_dir: &Path) -> Result<Vec<OsString>, PipelineError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(temp_dir).map_err(|e| PipelineError::io(temp_dir, e))? {
        let entry = entry.map_err(|e| PipelineError::io(temp_dir, e))?;
        let is_file = entry
            .file_type()
            .map_err(|e| PipelineError::io(entry.path(), e))?
            .is_file();
        if is_file {
            names.push(entry.file_name());
        }
    }
    names.sort();
    Ok(names)
}

/// OCR every scratch image and copy its original to `<output>/<label>.jpg`
///
/// Any failure aborts the pass and leaves the scratch directory in place.
pub fn extract_and_rename(
    config: &Config,
    engine: &dyn OcrEngine,
) -> Result<RenameSummary, PipelineError> {
    let names = scratch_images(&config.temp_dir)?;
    let total = names.len();
    let mut summary = RenameSummary::default();

    for (index, file_name) in names.iter().enumerate() {
        let name = file_name.to_string_lossy();
        tracing::info!(
            "Processing {} progress: {:.1}%",
            name,
            progress_percent(index, total)
        );

        let result = engine.process(&config.temp_dir.join(file_name))?;
        for warning in &result.warnings {
            tracing::warn!("{}: {}", name, warning);
        }

        let label = sanitize_label(&result.text, config.trim);
        if result.confidence < LOW_CONFIDENCE {
            tracing::warn!(
                "Low OCR confidence {:.2} for {} (raw text {:?})",
                result.confidence,
                name,
                result.text
            );
        }

        let source = config.input_dir.join(file_name);
        let target = output_path(&config.output_dir, &label, config.on_collision);
        fs::copy(&source, &target).map_err(|e| PipelineError::Copy {
            from: source.clone(),
            to: target.clone(),
            source: e,
        })?;

        tracing::debug!("Copied {} to {}", source.display(), target.display());
        summary.renamed.push(target);
    }

    fs::remove_dir_all(&config.temp_dir).map_err(|e| PipelineError::io(&config.temp_dir, e))?;

    Ok(summary)
}
