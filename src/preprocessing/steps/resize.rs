use crate::error::PipelineError;
use image::{imageops::FilterType, DynamicImage, GenericImageView};

/// Squeeze the image horizontally by `scale_x`, keeping its height
/// Timestamp glyphs in the overlay are stretched; narrowing them reads better.
pub fn apply(image: DynamicImage, scale_x: f32) -> Result<DynamicImage, PipelineError> {
    let (width, height) = image.dimensions();
    let new_width = scaled_width(width, scale_x);

    if new_width == 0 {
        return Err(PipelineError::PreprocessingError(format!(
            "scaling width {} by {} leaves no pixels",
            width, scale_x
        )));
    }

    if new_width == width {
        return Ok(image);
    }

    Ok(image.resize_exact(new_width, height, FilterType::CatmullRom))
}

/// Target width, truncated towards zero
pub fn scaled_width(width: u32, scale_x: f32) -> u32 {
    (f64::from(width) * f64::from(scale_x)) as u32
}
