use serde::{Deserialize, Serialize};

/// Marker centroid for one frame, in the dial ROI's own coordinate frame.
/// The frame index serializes under the key "z"; existing trace consumers
/// key on that name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameObservation {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "z")]
    pub frame: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceData {
    pub num_frames: u64,
    pub fps: f64,
    pub trace: Vec<FrameObservation>,
}

/// Envelope written to disk for one processed video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResponse {
    pub data: TraceData,
}
