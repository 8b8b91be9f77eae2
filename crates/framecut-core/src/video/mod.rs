pub mod decoder;
pub mod frame;

use anyhow::Result;

use self::frame::Frame;

/// A sequential source of decoded frames.
pub trait FrameSource {
    /// Average frame rate reported by the container. May be 0.0 when unknown.
    fn fps(&self) -> f64;

    /// Decode the next frame, or `None` once the stream is finished.
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}
