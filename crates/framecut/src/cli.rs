use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use framecut_core::OutputFormat;

#[derive(Parser)]
#[command(
    name = "framecut",
    version,
    about = "Extract frames from a video at a specified rate and save them as images."
)]
pub struct Cli {
    /// Path to the input video file (MP4, etc.).
    pub video_path: PathBuf,

    /// Directory where the extracted images will be saved (created if missing).
    pub output_dir: PathBuf,

    /// Number of frames to extract per second of video.
    #[arg(long, default_value_t = 1.0, value_parser = parse_rate)]
    pub rate: f64,

    /// Image format of the saved frames.
    #[arg(long, value_enum, default_value_t = FormatArg::Png)]
    pub format: FormatArg,

    /// File-name prefix placed before the six-digit frame index.
    #[arg(long, default_value = framecut_core::sink::DEFAULT_PREFIX)]
    pub prefix: String,

    /// Print the summary as a JSON object instead of a sentence.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Png,
    #[value(alias = "jpeg")]
    Jpg,
    Bmp,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Jpg => OutputFormat::Jpeg,
            FormatArg::Bmp => OutputFormat::Bmp,
        }
    }
}

fn parse_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|e| format!("`{s}` is not a number: {e}"))?;
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(format!("rate must be a positive number, got {s}"))
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["framecut", "in.mp4", "out"]).unwrap();
        assert_eq!(cli.video_path, PathBuf::from("in.mp4"));
        assert_eq!(cli.output_dir, PathBuf::from("out"));
        assert_eq!(cli.rate, 1.0);
        assert_eq!(cli.format, FormatArg::Png);
        assert_eq!(cli.prefix, "frame_");
        assert!(!cli.json);
    }

    #[test]
    fn explicit_options() {
        let cli = Cli::try_parse_from([
            "framecut", "in.mp4", "out", "--rate", "2.5", "--format", "jpeg", "--prefix", "shot_",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.rate, 2.5);
        assert_eq!(OutputFormat::from(cli.format), OutputFormat::Jpeg);
        assert_eq!(cli.prefix, "shot_");
        assert!(cli.json);
    }

    #[test]
    fn non_positive_rate_rejected() {
        for bad in ["0", "-1", "nan", "inf", "fast"] {
            assert!(
                Cli::try_parse_from(["framecut", "in.mp4", "out", "--rate", bad]).is_err(),
                "accepted --rate {bad}"
            );
        }
    }

    #[test]
    fn missing_output_dir_rejected() {
        assert!(Cli::try_parse_from(["framecut", "in.mp4"]).is_err());
    }
}
