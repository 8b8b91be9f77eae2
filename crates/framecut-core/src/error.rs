use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions of an extraction run.
///
/// End-of-stream is not represented here: running out of frames, including
/// a decode fault partway through the stream, ends the run normally.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("extraction rate must be a positive number, got {rate}")]
    InvalidRate { rate: f64 },

    #[error("source frame rate must be a positive number, got {fps}")]
    InvalidFps { fps: f64 },

    #[error("error opening video file {}", .path.display())]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("error retrieving video FPS for {} (reported {fps})", .path.display())]
    MetadataUnavailable { path: PathBuf, fps: f64 },

    #[error("failed to create output directory {}", .path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write frame to {}", .path.display())]
    WriteFrame {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
