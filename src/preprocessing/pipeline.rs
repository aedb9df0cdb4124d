use crate::config::Config;
use crate::error::PipelineError;
use image::DynamicImage;
use std::time::Instant;

use super::steps::{self, crop::CropRegion};

/// Timing information for a single preprocessing step
#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Result of preprocessing including timing stats
#[derive(Debug, Clone)]
pub struct PreprocessingResult {
    pub image: DynamicImage,
    /// Total preprocessing time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

/// Fixed chain that turns a screenshot into an OCR-friendly timestamp strip:
/// crop, resize, invert, contrast, pad
#[derive(Debug, Clone)]
pub struct Pipeline {
    crop: CropRegion,
    scale_x: f32,
    contrast: f32,
    padding: u32,
}

impl Pipeline {
    pub fn new(crop: CropRegion, scale_x: f32, contrast: f32, padding: u32) -> Self {
        Self {
            crop,
            scale_x,
            contrast,
            padding,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.crop, config.scale_x, config.contrast, config.padding)
    }

    /// Width and height of every image this pipeline produces, saturating at `u32::MAX`
    pub fn output_dimensions(&self) -> (u32, u32) {
        let border = self.padding.saturating_mul(2);
        (
            steps::resize::scaled_width(self.crop.width(), self.scale_x).saturating_add(border),
            self.crop.height().saturating_add(border),
        )
    }

    pub fn process(&self, image: DynamicImage) -> Result<PreprocessingResult, PipelineError> {
        let start = Instant::now();
        let mut steps_timing = Vec::new();

        // Work in 8-bit RGB so every encoder (JPEG included) can take the result
        let mut img = DynamicImage::ImageRgb8(image.into_rgb8());

        img = self.run_step("crop", img, &mut steps_timing, |i| {
            steps::crop::apply(i, self.crop)
        })?;
        img = self.run_step("resize", img, &mut steps_timing, |i| {
            steps::resize::apply(i, self.scale_x)
        })?;
        img = self.run_step("invert", img, &mut steps_timing, steps::invert::apply)?;
        img = self.run_step("contrast", img, &mut steps_timing, |i| {
            steps::contrast::apply(i, self.contrast)
        })?;
        img = self.run_step("pad", img, &mut steps_timing, |i| {
            steps::pad::apply(i, self.padding)
        })?;

        Ok(PreprocessingResult {
            image: img,
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: steps_timing,
        })
    }

    fn run_step<F>(
        &self,
        name: &str,
        img: DynamicImage,
        timings: &mut Vec<StepTiming>,
        step_fn: F,
    ) -> Result<DynamicImage, PipelineError>
    where
        F: FnOnce(DynamicImage) -> Result<DynamicImage, PipelineError>,
    {
        let step_start = Instant::now();
        let result = step_fn(img)?;
        timings.push(StepTiming {
            name: name.to_string(),
            time_ms: step_start.elapsed().as_millis() as u64,
        });
        Ok(result)
    }
}
