//! End-to-end runs against a clip generated with the ffmpeg CLI.
//! Ignored by default; run with `cargo test -- --ignored` where ffmpeg and
//! ffprobe are on PATH.

use std::path::{Path, PathBuf};
use std::process::Command;

use framecut_core::{run_extraction, ExtractConfig, ExtractError, OutputFormat};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("framecut-it")
        .join(format!("{name}-{}", std::process::id()));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write a 10-frame, 30 fps lossless test pattern clip.
fn make_clip(dir: &Path) -> PathBuf {
    let path = dir.join("clip.mkv");
    let status = Command::new("ffmpeg")
        .args([
            "-v", "error", "-y",
            "-f", "lavfi",
            "-i", "testsrc=size=64x48:rate=30",
            "-frames:v", "10",
            "-c:v", "ffv1",
        ])
        .arg(&path)
        .status()
        .expect("failed to run ffmpeg");
    assert!(status.success(), "ffmpeg could not generate the test clip");
    path
}

fn saved_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
#[ignore = "requires ffmpeg and ffprobe on PATH"]
fn one_per_second_from_short_clip_saves_first_frame() {
    let work = scratch_dir("one_per_second");
    let clip = make_clip(&work);
    let out = work.join("frames/nested");

    let summary = run_extraction(&ExtractConfig::new(&clip, &out)).unwrap();

    assert_eq!(summary.frames_read, 10);
    assert_eq!(summary.frames_saved, 1);
    assert_eq!(summary.stride, 30);
    assert_eq!(saved_files(&out), vec!["frame_000000.png"]);
}

#[test]
#[ignore = "requires ffmpeg and ffprobe on PATH"]
fn high_rate_saves_every_frame_densely() {
    let work = scratch_dir("every_frame");
    let clip = make_clip(&work);
    let out = work.join("frames");

    let mut config = ExtractConfig::new(&clip, &out);
    config.rate = 1000.0;
    config.format = OutputFormat::Bmp;
    let summary = run_extraction(&config).unwrap();

    assert_eq!(summary.stride, 1);
    assert_eq!(summary.frames_saved, 10);
    let expected: Vec<String> = (0..10).map(|i| format!("frame_{i:06}.bmp")).collect();
    assert_eq!(saved_files(&out), expected);

    let first = image::open(out.join("frame_000000.bmp")).unwrap();
    assert_eq!((first.width(), first.height()), (64, 48));
}

#[test]
#[ignore = "requires ffmpeg and ffprobe on PATH"]
fn rerun_into_fresh_directory_is_byte_identical() {
    let work = scratch_dir("rerun");
    let clip = make_clip(&work);

    let mut outputs = Vec::new();
    for name in ["a", "b"] {
        let out = work.join(name);
        let mut config = ExtractConfig::new(&clip, &out);
        config.rate = 10.0;
        let summary = run_extraction(&config).unwrap();
        assert_eq!(summary.frames_saved, 4);
        outputs.push(out);
    }

    assert_eq!(saved_files(&outputs[0]), saved_files(&outputs[1]));
    for name in saved_files(&outputs[0]) {
        let a = std::fs::read(outputs[0].join(&name)).unwrap();
        let b = std::fs::read(outputs[1].join(&name)).unwrap();
        assert_eq!(a, b, "{name} differs");
    }
}

#[test]
#[ignore = "requires ffmpeg and ffprobe on PATH"]
fn unreadable_file_is_reported_without_writing() {
    let work = scratch_dir("garbage");
    let bogus = work.join("not_a_video.mp4");
    std::fs::write(&bogus, b"definitely not a video container").unwrap();
    let out = work.join("frames");

    let err = run_extraction(&ExtractConfig::new(&bogus, &out)).unwrap_err();
    assert!(matches!(err, ExtractError::SourceOpen { .. }));
    assert!(!out.exists());
}
