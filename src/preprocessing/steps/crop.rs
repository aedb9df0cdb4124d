use crate::error::PipelineError;
use image::{imageops, DynamicImage, RgbImage};
use std::fmt;
use std::str::FromStr;

/// Rectangle of the timestamp overlay, as `(left, top, right, bottom)` pixel edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRegion {
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

impl Default for CropRegion {
    fn default() -> Self {
        Self::new(0, 0, 972, 32)
    }
}

impl fmt::Display for CropRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.left, self.top, self.right, self.bottom)
    }
}

impl FromStr for CropRegion {
    type Err = String;

    /// Parse `LEFT,TOP,RIGHT,BOTTOM`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid crop region '{}': {}", s, e))?;

        match parts.as_slice() {
            [left, top, right, bottom] => Ok(Self::new(*left, *top, *right, *bottom)),
            _ => Err(format!(
                "invalid crop region '{}': expected LEFT,TOP,RIGHT,BOTTOM",
                s
            )),
        }
    }
}

/// Cut the region out of the image
/// The result is always `region.width() x region.height()`; any part of the
/// region that falls outside the source stays black.
pub fn apply(image: DynamicImage, region: CropRegion) -> Result<DynamicImage, PipelineError> {
    let source = image.into_rgb8();
    let mut cropped = RgbImage::new(region.width(), region.height());
    imageops::replace(
        &mut cropped,
        &source,
        -i64::from(region.left),
        -i64::from(region.top),
    );
    Ok(DynamicImage::ImageRgb8(cropped))
}
