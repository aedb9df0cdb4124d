use crate::error::PipelineError;
use image::{imageops, DynamicImage, Rgb, RgbImage};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Surround the image with a white border of `padding` pixels on every side
pub fn apply(image: DynamicImage, padding: u32) -> Result<DynamicImage, PipelineError> {
    if padding == 0 {
        return Ok(image);
    }

    let rgb = image.into_rgb8();
    let grow = |side: u32| {
        padding
            .checked_mul(2)
            .and_then(|border| side.checked_add(border))
            .ok_or_else(|| {
                PipelineError::PreprocessingError(format!(
                    "padding {} overflows a {}x{} image",
                    padding,
                    rgb.width(),
                    rgb.height()
                ))
            })
    };
    let mut padded = RgbImage::from_pixel(grow(rgb.width())?, grow(rgb.height())?, WHITE);
    imageops::replace(&mut padded, &rgb, i64::from(padding), i64::from(padding));

    Ok(DynamicImage::ImageRgb8(padded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_adds_white_border() {
        let img = RgbImage::from_pixel(4, 2, Rgb([0, 0, 0]));

        let result = apply(DynamicImage::ImageRgb8(img), 10).unwrap().to_rgb8();

        assert_eq!(result.dimensions(), (24, 22));
        assert_eq!(result.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(result.get_pixel(9, 10).0, [255, 255, 255]);
        assert_eq!(result.get_pixel(10, 10).0, [0, 0, 0]);
        assert_eq!(result.get_pixel(13, 11).0, [0, 0, 0]);
        assert_eq!(result.get_pixel(14, 11).0, [255, 255, 255]);
        assert_eq!(result.get_pixel(23, 21).0, [255, 255, 255]);
    }

    #[test]
    fn test_pad_rejects_overflowing_border() {
        let img = RgbImage::new(4, 2);
        let err = apply(DynamicImage::ImageRgb8(img), 2_147_483_648).unwrap_err();
        assert!(matches!(err, PipelineError::PreprocessingError(_)));
    }
}
