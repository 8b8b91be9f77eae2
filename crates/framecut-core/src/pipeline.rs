use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ExtractError;
use crate::sampler::{validate_rate, FrameSampler};
use crate::sink::{FrameSink, FrameWriter, OutputFormat, DEFAULT_PREFIX};
use crate::video::decoder::VideoDecoder;
use crate::video::FrameSource;

/// Parameters for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Video file to read.
    pub input: PathBuf,
    /// Directory receiving the saved frames. Created if missing.
    pub output_dir: PathBuf,
    /// Desired number of saved frames per second of source video.
    pub rate: f64,
    /// Encoding of the saved frames.
    pub format: OutputFormat,
    /// File-name prefix placed before the dense index.
    pub prefix: String,
}

impl ExtractConfig {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            rate: 1.0,
            format: OutputFormat::default(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionSummary {
    pub source_fps: f64,
    pub stride: u64,
    pub frames_read: u64,
    pub frames_saved: u64,
    pub output_dir: PathBuf,
}

/// Extract frames from the video at `config.input` into `config.output_dir`.
///
/// All fatal conditions are detected before the first frame is read. The
/// output directory is only created once the source is open and its frame
/// rate is known, so a failed open leaves the filesystem untouched.
pub fn run_extraction(config: &ExtractConfig) -> Result<ExtractionSummary, ExtractError> {
    validate_rate(config.rate)?;

    debug!(
        input = ?config.input,
        output_dir = ?config.output_dir,
        rate = config.rate,
        format = %config.format,
        "extraction starting"
    );

    let mut decoder = VideoDecoder::open(&config.input).map_err(|source| {
        ExtractError::SourceOpen {
            path: config.input.clone(),
            source,
        }
    })?;

    run_with_source(&mut decoder, config)
}

/// Extract from an already opened source, writing into `config.output_dir`.
///
/// `config.input` is only used to label errors.
pub fn run_with_source<S: FrameSource>(
    source: &mut S,
    config: &ExtractConfig,
) -> Result<ExtractionSummary, ExtractError> {
    validate_rate(config.rate)?;

    let source_fps = source.fps();
    let sampler = sampler_for(&*source, &config.input, config.rate)?;

    std::fs::create_dir_all(&config.output_dir).map_err(|source| {
        ExtractError::CreateOutputDir {
            path: config.output_dir.clone(),
            source,
        }
    })?;
    debug!(dir = ?config.output_dir, "output directory ready");

    let mut writer = FrameWriter::new(&config.output_dir, config.prefix.as_str(), config.format);
    let counts = extract_frames(source, &mut writer, sampler)?;

    let summary = ExtractionSummary {
        source_fps,
        stride: sampler.stride(),
        frames_read: counts.frames_read,
        frames_saved: counts.frames_saved,
        output_dir: config.output_dir.clone(),
    };

    info!(
        frames_read = summary.frames_read,
        frames_saved = summary.frames_saved,
        stride = summary.stride,
        "extraction complete"
    );
    Ok(summary)
}

/// Check the source's frame rate and derive the sampler from it.
fn sampler_for(
    source: &impl FrameSource,
    path: &Path,
    rate: f64,
) -> Result<FrameSampler, ExtractError> {
    FrameSampler::from_rates(source.fps(), rate).map_err(|e| match e {
        ExtractError::InvalidFps { fps } => ExtractError::MetadataUnavailable {
            path: path.to_path_buf(),
            fps,
        },
        other => other,
    })
}

/// Totals from one pass of the sampling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameCounts {
    pub frames_read: u64,
    pub frames_saved: u64,
}

/// Run the sampling loop over `source`, handing kept frames to `sink`.
///
/// A decode error ends the loop exactly like end-of-stream; the frames saved
/// up to that point stand. Write errors abort the run.
pub fn extract_frames<S, K>(
    source: &mut S,
    sink: &mut K,
    sampler: FrameSampler,
) -> Result<FrameCounts, ExtractError>
where
    S: FrameSource,
    K: FrameSink,
{
    let mut counts = FrameCounts::default();

    loop {
        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                let message = format!("{e:#}");
                warn!(
                    frame = counts.frames_read,
                    frames_saved = counts.frames_saved,
                    error = %message,
                    "decode failed, treating as end of stream"
                );
                break;
            }
        };

        if sampler.should_keep(counts.frames_read) {
            sink.write_frame(counts.frames_saved, &frame)?;
            counts.frames_saved += 1;
        }
        counts.frames_read += 1;
    }

    Ok(counts)
}
