use std::fmt;
use std::path::PathBuf;

use image::ImageFormat;
use tracing::debug;

use crate::error::ExtractError;
use crate::video::frame::Frame;

pub const DEFAULT_PREFIX: &str = "frame_";

/// Width of the zero-padded dense index in output file names.
const INDEX_WIDTH: usize = 6;

/// Image encoding used for saved frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Bmp,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Bmp => "bmp",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Bmp => ImageFormat::Bmp,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Destination for kept frames.
pub trait FrameSink {
    /// Persist `frame` under the dense save index `index` and return where it went.
    fn write_frame(&mut self, index: u64, frame: &Frame) -> Result<PathBuf, ExtractError>;
}

/// Writes frames as flat, sequentially numbered image files in one directory.
pub struct FrameWriter {
    dir: PathBuf,
    prefix: String,
    format: OutputFormat,
}

impl FrameWriter {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, format: OutputFormat) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            format,
        }
    }

    /// Path of the file holding the `index`-th saved frame.
    pub fn output_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!(
            "{}{:0width$}.{}",
            self.prefix,
            index,
            self.format.extension(),
            width = INDEX_WIDTH
        ))
    }
}

impl FrameSink for FrameWriter {
    fn write_frame(&mut self, index: u64, frame: &Frame) -> Result<PathBuf, ExtractError> {
        let path = self.output_path(index);
        frame
            .image
            .save_with_format(&path, self.format.image_format())
            .map_err(|source| ExtractError::WriteFrame {
                path: path.clone(),
                source,
            })?;

        debug!(?path, index, frame_number = frame.frame_number, "saved frame");
        Ok(path)
    }
}
