// src/geometry.rs

use anyhow::Result;
use opencv::core::Rect;

/// Inset of the dial's bottom-right corner from the frame's bottom-right
/// corner, in pixels. Determined by visual inspection of Catalyst footage.
pub const OVERLAY_OFFSET: i32 = 25;

/// Pixel bounds of the dial overlay within a frame.
///
/// Catalyst renders the overlay at a fixed position for the whole video, so
/// the geometry is located once from the first decoded frame and then passed
/// around by value; the tracking loop never recomputes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    pub start_x: i32,
    pub end_x: i32,
    pub start_y: i32,
    pub end_y: i32,
}

impl FrameGeometry {
    pub fn locate(
        frame_height: i32,
        frame_width: i32,
        roi_height: i32,
        roi_width: i32,
    ) -> Result<Self> {
        let start_y = frame_height - OVERLAY_OFFSET - roi_height;
        let start_x = frame_width - OVERLAY_OFFSET - roi_width;

        if start_x < 0 || start_y < 0 {
            anyhow::bail!(
                "dial overlay ({}x{} plus {}px inset) does not fit in a {}x{} frame",
                roi_width,
                roi_height,
                OVERLAY_OFFSET,
                frame_width,
                frame_height
            );
        }

        Ok(Self {
            start_x,
            end_x: frame_width - OVERLAY_OFFSET,
            start_y,
            end_y: frame_height - OVERLAY_OFFSET,
        })
    }

    /// The crop rectangle applied to every frame of the video.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.start_x,
            self.start_y,
            self.end_x - self.start_x,
            self.end_y - self.start_y,
        )
    }
}
