// src/main.rs

mod cli;
mod geometry;
mod mask;
mod tracker;
mod types;
mod video;

use anyhow::{anyhow, Result};
use clap::Parser;
use cli::Cli;
use geometry::FrameGeometry;
use mask::DialMask;
use opencv::prelude::*;
use std::fs;
use std::path::Path;
use tracker::MarkerTracker;
use tracing::info;
use types::{FrameObservation, ProcessingResponse, TraceData};
use video::VideoReader;

fn main() -> Result<()> {
    // stdout carries only the artifact path; all logging goes to stderr
    tracing_subscriber::fmt()
        .with_env_filter("gforce_trace=info")
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    args.validate()?;

    let mask = DialMask::from_template(&args.template_path)?;
    info!("✓ Dial mask ready ({}x{})", mask.width(), mask.height());

    let metadata = video::probe_metadata(&args.data_file_path)?;

    let geometry = locate_geometry(&args.data_file_path, &mask)?;
    info!(
        "✓ Overlay located: x {}..{}, y {}..{}",
        geometry.start_x, geometry.end_x, geometry.start_y, geometry.end_y
    );

    let reader = VideoReader::open(&args.data_file_path)?;
    let trace: Vec<FrameObservation> = MarkerTracker::new(reader, geometry, &mask).collect();
    info!(
        "✓ Marker detected in {} of {} frames",
        trace.len(),
        metadata.num_frames
    );

    let response = ProcessingResponse {
        data: TraceData {
            num_frames: metadata.num_frames,
            fps: metadata.fps,
            trace,
        },
    };

    fs::create_dir_all(&args.output_path)?;
    let file_path = args
        .output_path
        .join(format!("video_{}.json", uuid::Uuid::new_v4()));
    fs::write(&file_path, serde_json::to_string(&response)?)?;
    info!("💾 Trace saved to {}", file_path.display());

    println!("{}", file_path.display());
    Ok(())
}

/// The overlay sits at the same place in every frame, so one sample frame is
/// enough to pin the geometry for the whole video.
fn locate_geometry(video_path: &Path, mask: &DialMask) -> Result<FrameGeometry> {
    let mut reader = VideoReader::open(video_path)?;
    let sample = reader
        .read_frame()
        .ok_or_else(|| anyhow!("video {} produced no frames", video_path.display()))?;

    FrameGeometry::locate(sample.rows(), sample.cols(), mask.height(), mask.width())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_video_fails_before_tracking() {
        let mask = DialMask::from_dimensions(50, 50).unwrap();
        let path = std::env::temp_dir().join(format!("gforce_trace_{}.mp4", uuid::Uuid::new_v4()));
        fs::write(&path, b"not a video container").unwrap();

        let result = locate_geometry(&path, &mask);
        fs::remove_file(&path).unwrap();

        // no sample frame means no geometry, long before the tracking loop
        assert!(result.is_err());
    }
}
