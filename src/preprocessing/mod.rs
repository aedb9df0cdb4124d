//! Image preprocessing stage
//!
//! Crops the timestamp overlay out of every source image, enhances it for OCR
//! and writes the result into the scratch directory under the source filename.

pub mod pipeline;
pub mod steps;

pub use pipeline::Pipeline;

use crate::config::Config;
use crate::error::PipelineError;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

/// Filenames of the source images in the input folder, sorted
/// Names are kept as the OS returned them so non UTF-8 names round-trip.
pub fn source_images(config: &Config) -> Result<Vec<OsString>, PipelineError> {
    let entries =
        fs::read_dir(&config.input_dir).map_err(|e| PipelineError::io(&config.input_dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::io(&config.input_dir, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| PipelineError::io(entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }

        let name = entry.file_name();
        if config.is_source_image(&name) {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// Run the pipeline over every source image, returning the written scratch paths
///
/// The first unreadable image aborts the whole stage.
pub fn preprocess_dir(config: &Config) -> Result<Vec<PathBuf>, PipelineError> {
    fs::create_dir_all(&config.temp_dir).map_err(|e| PipelineError::io(&config.temp_dir, e))?;

    let pipeline = Pipeline::from_config(config);
    let names = source_images(config)?;
    let mut written = Vec::with_capacity(names.len());

    let (width, height) = pipeline.output_dimensions();
    tracing::debug!(
        "Preprocessing {} images from {} into {}x{} strips",
        names.len(),
        config.input_dir.display(),
        width,
        height
    );

    for name in &names {
        let source_path = config.input_dir.join(name);
        let image = image::open(&source_path).map_err(|e| {
            PipelineError::PreprocessingError(format!(
                "Failed to load {}: {}",
                source_path.display(),
                e
            ))
        })?;

        let result = pipeline.process(image)?;
        tracing::debug!(
            "Preprocessed {} in {}ms ({})",
            name.to_string_lossy(),
            result.total_time_ms,
            result
                .steps
                .iter()
                .map(|s| format!("{} {}ms", s.name, s.time_ms))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let target_path = config.temp_dir.join(name);
        result.image.save(&target_path).map_err(|e| {
            PipelineError::PreprocessingError(format!(
                "Failed to save {}: {}",
                target_path.display(),
                e
            ))
        })?;
        written.push(target_path);
    }

    tracing::info!(
        "Cropping, inverting colors, enhancing contrast, and adding padding completed ({} images)",
        written.len()
    );

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::path::Path;

    fn write_image(dir: &Path, name: &str, width: u32, height: u32) {
        RgbImage::from_pixel(width, height, Rgb([40, 40, 40]))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn test_preprocess_dir_handles_supported_extensions() {
        let input = tempfile::tempdir().unwrap();
        write_image(input.path(), "a.jpg", 1000, 40);
        write_image(input.path(), "b.png", 1000, 40);
        write_image(input.path(), "c.JPG", 1000, 40);
        fs::write(input.path().join("d.gif"), b"GIF89a").unwrap();
        fs::write(input.path().join("notes.txt"), "not an image").unwrap();

        let config = Config::new(input.path(), input.path().join("out"));
        let written = preprocess_dir(&config).unwrap();

        assert_eq!(written.len(), 3);
        let mut temp_names: Vec<String> = fs::read_dir(&config.temp_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        temp_names.sort();
        assert_eq!(temp_names, ["a.jpg", "b.png", "c.JPG"]);

        for path in written {
            let img = image::open(&path).unwrap();
            assert_eq!((img.width(), img.height()), (506, 52));
        }
    }

    #[test]
    fn test_source_images_skips_directories() {
        let input = tempfile::tempdir().unwrap();
        fs::create_dir(input.path().join("folder.jpg")).unwrap();
        write_image(input.path(), "shot.png", 10, 10);

        let config = Config::new(input.path(), input.path().join("out"));
        assert_eq!(
            source_images(&config).unwrap(),
            vec![OsString::from("shot.png")]
        );
    }

    #[test]
    fn test_preprocess_dir_aborts_on_corrupt_image() {
        let input = tempfile::tempdir().unwrap();
        fs::write(input.path().join("broken.png"), b"definitely not a png").unwrap();

        let config = Config::new(input.path(), input.path().join("out"));
        let err = preprocess_dir(&config).unwrap_err();
        assert!(matches!(err, PipelineError::PreprocessingError(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_preprocess_dir_keeps_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let input = tempfile::tempdir().unwrap();
        let name = OsStr::from_bytes(b"shot\xff.jpg");
        RgbImage::from_pixel(1000, 40, Rgb([40, 40, 40]))
            .save(input.path().join(name))
            .unwrap();

        let config = Config::new(input.path(), input.path().join("out"));
        let written = preprocess_dir(&config).unwrap();

        assert_eq!(written, vec![config.temp_dir.join(name)]);
        assert!(config.temp_dir.join(name).is_file());
    }
}
