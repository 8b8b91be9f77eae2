use tracing::debug;

use crate::error::ExtractError;

/// Decides which source frames to keep for a requested extraction rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSampler {
    stride: u64,
}

impl FrameSampler {
    /// Build a sampler that keeps roughly `rate` frames per second of a
    /// source running at `source_fps`.
    ///
    /// The stride is `round(source_fps / rate)` with ties going to the even
    /// neighbour, clamped to at least 1.
    pub fn from_rates(source_fps: f64, rate: f64) -> Result<Self, ExtractError> {
        validate_rate(rate)?;
        if !(source_fps.is_finite() && source_fps > 0.0) {
            return Err(ExtractError::InvalidFps { fps: source_fps });
        }

        let ratio = (source_fps / rate).round_ties_even();
        // Saturating float-to-int cast: huge ratios still give a usable stride.
        let stride = (ratio as u64).max(1);

        debug!(source_fps, rate, stride, "computed frame stride");
        Ok(Self { stride })
    }

    /// Build a sampler with an explicit stride. A zero stride is clamped to 1.
    pub fn with_stride(stride: u64) -> Self {
        Self {
            stride: stride.max(1),
        }
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Whether the frame at zero-based observation index `index` is kept.
    pub fn should_keep(&self, index: u64) -> bool {
        index % self.stride == 0
    }
}

/// Reject rates that cannot produce a stride.
pub fn validate_rate(rate: f64) -> Result<(), ExtractError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(ExtractError::InvalidRate { rate })
    }
}
