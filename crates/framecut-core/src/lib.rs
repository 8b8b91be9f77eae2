//! Sample frames out of a video at a fixed rate and save them as images.

pub mod error;
pub mod pipeline;
pub mod sampler;
pub mod sink;
pub mod video;

pub use error::ExtractError;
pub use pipeline::{run_extraction, run_with_source, ExtractConfig, ExtractionSummary};
pub use sink::OutputFormat;
