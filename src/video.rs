// src/video.rs

use anyhow::Result;
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureTrait, VideoCaptureTraitConst},
};
use std::path::Path;
use tracing::{debug, info};

/// Frame count and rate as reported by the container. Probed in its own
/// capture pass, independent of the tracking pass.
#[derive(Debug, Clone, Copy)]
pub struct VideoMetadata {
    pub num_frames: u64,
    pub fps: f64,
}

pub fn probe_metadata(path: &Path) -> Result<VideoMetadata> {
    let cap = open_capture(path)?;

    let num_frames = VideoCaptureTraitConst::get(&cap, videoio::CAP_PROP_FRAME_COUNT)? as i64;
    let fps = VideoCaptureTraitConst::get(&cap, videoio::CAP_PROP_FPS)?;

    info!(
        "Video properties: {} frames @ {:.2} FPS",
        num_frames.max(0),
        fps
    );

    Ok(VideoMetadata {
        num_frames: num_frames.max(0) as u64,
        fps,
    })
}

fn open_capture(path: &Path) -> Result<VideoCapture> {
    let cap = VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)?;
    if !cap.is_opened()? {
        anyhow::bail!("failed to open video {}", path.display());
    }
    Ok(cap)
}

/// Sequential frame reader. The capture handle is owned here and released
/// when the reader drops, on every exit path.
pub struct VideoReader {
    cap: VideoCapture,
    current_frame: u64,
}

impl VideoReader {
    pub fn open(path: &Path) -> Result<Self> {
        let cap = open_capture(path)?;
        Ok(Self {
            cap,
            current_frame: 0,
        })
    }

    /// 1-based index of the most recently decoded frame.
    pub fn current_frame(&self) -> u64 {
        self.current_frame
    }

    /// Decodes the next frame in stream order. Returns `None` at end of
    /// stream; a decode failure mid-stream is treated the same way, keeping
    /// whatever was gathered so far.
    pub fn read_frame(&mut self) -> Option<Mat> {
        let mut frame = Mat::default();
        match VideoCaptureTrait::read(&mut self.cap, &mut frame) {
            Ok(true) if !frame.empty() => {
                self.current_frame += 1;
                Some(frame)
            }
            Ok(_) => None,
            Err(e) => {
                debug!(
                    "decode stopped after frame {}: {}",
                    self.current_frame, e
                );
                None
            }
        }
    }
}
