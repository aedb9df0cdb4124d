use crate::error::PipelineError;
use image::{DynamicImage, Rgb, RgbImage};

/// Scale each channel's distance from the image's mean luma by `factor`
///
/// `factor == 1.0` leaves the image unchanged, `0.0` flattens it to the mean
/// gray, values above one push pixels away from the mean and clip at 0/255.
pub fn apply(image: DynamicImage, factor: f32) -> Result<DynamicImage, PipelineError> {
    let mut rgb = image.into_rgb8();
    let mean = mean_luma(&rgb) as f32;

    for pixel in rgb.pixels_mut() {
        pixel.0 = pixel.0.map(|v| blend(mean, v as f32, factor));
    }

    Ok(DynamicImage::ImageRgb8(rgb))
}

/// Rounded mean of the ITU-R 601-2 luma over the whole image
fn mean_luma(img: &RgbImage) -> u8 {
    let pixel_count = u64::from(img.width()) * u64::from(img.height());
    if pixel_count == 0 {
        return 0;
    }

    let total: u64 = img.pixels().map(|p| u64::from(luma(p))).sum();
    ((total as f64 / pixel_count as f64) + 0.5) as u8
}

/// Fixed-point 0.299 R + 0.587 G + 0.114 B
fn luma(Rgb([r, g, b]): &Rgb<u8>) -> u8 {
    ((u32::from(*r) * 19595 + u32::from(*g) * 38470 + u32::from(*b) * 7471 + 0x8000) >> 16) as u8
}

fn blend(base: f32, value: f32, factor: f32) -> u8 {
    let out = base + factor * (value - base);
    if out <= 0.0 {
        0
    } else if out >= 255.0 {
        255
    } else {
        out as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contrast_pushes_values_from_mean() {
        let img = RgbImage::from_fn(10, 10, |x, _| {
            if x < 5 {
                Rgb([100, 100, 100])
            } else {
                Rgb([200, 200, 200])
            }
        });

        let result = apply(DynamicImage::ImageRgb8(img), 2.0).unwrap().to_rgb8();

        assert_eq!(result.get_pixel(0, 0).0, [50, 50, 50]);
        assert_eq!(result.get_pixel(9, 0).0, [250, 250, 250]);
    }

    #[test]
    fn test_contrast_clips_to_channel_range() {
        let img = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });

        let result = apply(DynamicImage::ImageRgb8(img), 2.0).unwrap().to_rgb8();

        assert_eq!(result.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(result.get_pixel(1, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_contrast_leaves_uniform_image_alone() {
        let img = RgbImage::from_pixel(8, 8, Rgb([90, 90, 90]));
        let result = apply(DynamicImage::ImageRgb8(img), 2.0).unwrap().to_rgb8();
        assert!(result.pixels().all(|p| p.0 == [90, 90, 90]));
    }

    #[test]
    fn test_luma_weights() {
        assert_eq!(luma(&Rgb([255, 255, 255])), 255);
        assert_eq!(luma(&Rgb([0, 0, 0])), 0);
        assert_eq!(luma(&Rgb([255, 0, 0])), 76);
        assert_eq!(luma(&Rgb([0, 255, 0])), 150);
        assert_eq!(luma(&Rgb([0, 0, 255])), 29);
    }
}
