use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use anyhow::{bail, Context, Result};
use image::RgbImage;
use tracing::{debug, warn};

use super::frame::Frame;
use super::FrameSource;

/// Video metadata obtained by probing with ffprobe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeResult {
    pub width: u32,
    pub height: u32,
    /// Average frame rate, or 0.0 if the container does not report one.
    pub fps: f64,
}

fn probe(path: &Path) -> Result<ProbeResult> {
    debug!(?path, "probing video metadata with ffprobe");

    let output = Command::new("ffprobe")
        .args([
            "-v", "error",
            "-select_streams", "v:0",
            "-show_entries",
            "stream=width,height,avg_frame_rate,r_frame_rate:stream_tags=rotate:stream_side_data=rotation",
            "-of", "default=noprint_wrappers=1",
        ])
        .arg(path)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .context("failed to run ffprobe, is ffmpeg installed?")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(%stderr, ?path, "ffprobe failed");
        bail!("ffprobe failed: {}", last_line(&stderr));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let result = parse_probe_output(&stdout)?;

    debug!(
        width = result.width,
        height = result.height,
        fps = result.fps,
        "probe completed"
    );
    Ok(result)
}

/// Last non-blank line of a tool's stderr, where ffmpeg puts the actual reason.
fn last_line(stderr: &str) -> &str {
    stderr
        .lines()
        .map(str::trim)
        .rev()
        .find(|l| !l.is_empty())
        .unwrap_or("no diagnostic output")
}

/// Parse `key=value` lines printed by ffprobe for the first video stream.
///
/// The average frame rate wins; `r_frame_rate` is only consulted when the
/// average is missing or `0/0`. Width and height are reported as displayed:
/// ffmpeg applies rotation metadata while decoding, so a quarter turn swaps them.
pub fn parse_probe_output(stdout: &str) -> Result<ProbeResult> {
    let mut width = None;
    let mut height = None;
    let mut avg_fps = None;
    let mut r_fps = None;
    let mut rotation: Option<i64> = None;

    for line in stdout.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        match key {
            "width" => width = Some(value.parse::<u32>().context("failed to parse width")?),
            "height" => height = Some(value.parse::<u32>().context("failed to parse height")?),
            "avg_frame_rate" => avg_fps = parse_frame_rate(value),
            "r_frame_rate" => r_fps = parse_frame_rate(value),
            // Display matrix side data, or the legacy stream tag on older ffprobe.
            "rotation" | "TAG:rotate" => {
                if let Ok(degrees) = value.trim().parse::<f64>() {
                    rotation = Some(degrees.round() as i64);
                }
            }
            _ => {}
        }
    }

    let (Some(width), Some(height)) = (width, height) else {
        debug!(%stdout, "ffprobe reported no video stream dimensions");
        bail!("no video stream found");
    };
    if width == 0 || height == 0 {
        bail!("invalid video dimensions: {width}x{height}");
    }
    let (width, height) = match rotation {
        Some(degrees) if degrees.rem_euclid(180) == 90 => {
            debug!(degrees, "rotated stream, swapping frame dimensions");
            (height, width)
        }
        _ => (width, height),
    };

    let fps = match (avg_fps, r_fps) {
        (Some(avg), _) if avg > 0.0 => avg,
        (_, Some(r)) if r > 0.0 => {
            warn!(r_fps = r, "average frame rate unavailable, falling back to r_frame_rate");
            r
        }
        _ => 0.0,
    };

    Ok(ProbeResult { width, height, fps })
}

/// Parse an ffprobe rate such as `30000/1001` or `25`.
///
/// A zero denominator yields 0.0. Unparseable values (e.g. `N/A`) yield `None`.
pub fn parse_frame_rate(value: &str) -> Option<f64> {
    let value = value.trim();
    if let Some((num, den)) = value.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        Some(if den > 0.0 { num / den } else { 0.0 })
    } else {
        value.parse().ok()
    }
}

/// Decodes video frames by piping raw RGB24 data from the ffmpeg CLI.
pub struct VideoDecoder {
    child: Child,
    width: u32,
    height: u32,
    fps: f64,
    frame_count: u64,
    frame_bytes: usize,
}

impl VideoDecoder {
    /// Open a video file for decoding.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            bail!("video file does not exist: {}", path.display());
        }

        let info = probe(path)?;

        debug!(?path, "spawning ffmpeg decoder process");

        // `-map 0:v:0` pins the decoded stream to the one ffprobe measured.
        let child = Command::new("ffmpeg")
            .args(["-i"])
            .arg(path)
            .args([
                "-map", "0:v:0",
                "-an",
                "-f", "rawvideo",
                "-pix_fmt", "rgb24",
                "-v", "error",
                "pipe:1",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn ffmpeg, is ffmpeg installed?")?;

        let frame_bytes = (info.width as usize) * (info.height as usize) * 3;

        debug!(
            width = info.width,
            height = info.height,
            fps = info.fps,
            frame_bytes,
            "video decoder opened"
        );

        Ok(Self {
            child,
            width: info.width,
            height: info.height,
            fps: info.fps,
            frame_count: 0,
            frame_bytes,
        })
    }

    /// Read the next frame from the ffmpeg pipe, or `None` if the video is finished.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        let stdout = self
            .child
            .stdout
            .as_mut()
            .context("ffmpeg stdout not available")?;

        let mut buf = vec![0u8; self.frame_bytes];
        let mut read = 0;

        while read < self.frame_bytes {
            match stdout.read(&mut buf[read..]) {
                Ok(0) => {
                    if read == 0 {
                        debug!(total_frames = self.frame_count, "video stream ended");
                        return Ok(None);
                    }
                    debug!(
                        read_bytes = read,
                        expected_bytes = self.frame_bytes,
                        frame = self.frame_count,
                        "ffmpeg stream ended mid-frame"
                    );
                    bail!(
                        "ffmpeg stream ended mid-frame (read {read}/{} bytes)",
                        self.frame_bytes,
                    );
                }
                Ok(n) => read += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!(frame = self.frame_count, %e, "failed to read from ffmpeg pipe");
                    return Err(e).context("failed to read from ffmpeg pipe");
                }
            }
        }

        let image = RgbImage::from_raw(self.width, self.height, buf)
            .context("failed to create RgbImage from raw frame data")?;

        let frame_number = self.frame_count;
        self.frame_count += 1;

        debug!(frame_number, "decoded frame");

        Ok(Some(Frame {
            image,
            frame_number,
        }))
    }
}

impl FrameSource for VideoDecoder {
    fn fps(&self) -> f64 {
        self.fps
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        VideoDecoder::next_frame(self)
    }
}

impl Drop for VideoDecoder {
    fn drop(&mut self) {
        debug!(total_frames = self.frame_count, "closing video decoder");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
