use crate::error::PipelineError;
use crate::preprocessing::steps::crop::CropRegion;
use crate::Args;
use std::ffi::OsStr;
use std::path::PathBuf;

/// Name of the scratch directory created inside the input folder
pub const TEMP_DIR_NAME: &str = "temp";

/// Filename suffixes picked up from the input folder (case-sensitive)
pub const SOURCE_EXTENSIONS: [&str; 3] = [".jpg", ".png", ".JPG"];

/// Extension forced onto every renamed copy
pub const OUTPUT_EXTENSION: &str = ".jpg";

/// Largest width or height any intermediate image may reach
pub const MAX_DIMENSION: u32 = 65_535;

/// What to do when two images produce the same label
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Replace the earlier copy
    #[default]
    Overwrite,
    /// Append `_1`, `_2`, ... until the name is free
    Suffix,
}

/// Run configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub crop: CropRegion,
    pub scale_x: f32,
    pub contrast: f32,
    pub padding: u32,
    pub extensions: Vec<String>,
    pub engine: Option<String>,
    pub language: String,
    pub tessdata_path: Option<String>,
    pub trim: bool,
    pub on_collision: CollisionPolicy,
}

impl Config {
    /// Build a config with the default processing parameters
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        let input_dir = input_dir.into();
        Self {
            temp_dir: input_dir.join(TEMP_DIR_NAME),
            input_dir,
            output_dir: output_dir.into(),
            crop: CropRegion::default(),
            scale_x: 0.5,
            contrast: 2.0,
            padding: 10,
            extensions: SOURCE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            engine: None,
            language: "eng".to_string(),
            tessdata_path: None,
            trim: false,
            on_collision: CollisionPolicy::Overwrite,
        }
    }

    /// Whether a filename in the input folder is a source image
    /// Names need not be valid UTF-8; the suffix is matched on raw bytes.
    pub fn is_source_image(&self, file_name: impl AsRef<OsStr>) -> bool {
        let name = file_name.as_ref().as_encoded_bytes();
        self.extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_bytes()))
    }

    fn validate(self) -> Result<Self, PipelineError> {
        if self.crop.width() == 0 || self.crop.height() == 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "crop region {} is empty",
                self.crop
            )));
        }
        if self.scale_x.is_nan() || self.scale_x <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "scale factor must be positive, got {}",
                self.scale_x
            )));
        }
        if self.contrast.is_nan() || self.contrast < 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "contrast factor must not be negative, got {}",
                self.contrast
            )));
        }

        let border = 2 * u64::from(self.padding);
        let scaled_width = (f64::from(self.crop.width()) * f64::from(self.scale_x)).floor();
        let largest = [
            f64::from(self.crop.width()),
            f64::from(self.crop.height()),
            scaled_width + border as f64,
            f64::from(self.crop.height()) + border as f64,
        ]
        .into_iter()
        .fold(0.0, f64::max);
        if largest > f64::from(MAX_DIMENSION) {
            return Err(PipelineError::InvalidConfig(format!(
                "crop {}, scale {} and padding {} give images larger than {} pixels",
                self.crop, self.scale_x, self.padding, MAX_DIMENSION
            )));
        }
        Ok(self)
    }
}

impl TryFrom<Args> for Config {
    type Error = PipelineError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let mut config = Config::new(args.input_folder, args.output_folder);
        config.crop = args.crop;
        config.scale_x = args.scale_x;
        config.contrast = args.contrast;
        config.padding = args.padding;
        config.engine = args.engine;
        config.language = args.language;
        config.tessdata_path = args.tessdata_path;
        config.trim = args.trim;
        config.on_collision = args.on_collision;
        config.validate()
    }
}
