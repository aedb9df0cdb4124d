use crate::error::PipelineError;
use image::{imageops, DynamicImage};

/// Invert every color channel
/// The overlay is light text on a dark band; OCR wants dark on light.
pub fn apply(image: DynamicImage) -> Result<DynamicImage, PipelineError> {
    let mut rgb = image.into_rgb8();
    imageops::invert(&mut rgb);
    Ok(DynamicImage::ImageRgb8(rgb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_invert_flips_channels() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([0, 128, 255]));
        img.put_pixel(1, 0, Rgb([10, 20, 30]));

        let result = apply(DynamicImage::ImageRgb8(img)).unwrap().to_rgb8();

        assert_eq!(result.get_pixel(0, 0).0, [255, 127, 0]);
        assert_eq!(result.get_pixel(1, 0).0, [245, 235, 225]);
    }
}
