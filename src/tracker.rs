// src/tracker.rs
//
// Per-frame marker isolation: crop the frame to the dial ROI, null
// everything outside the circular mask, segment the red marker in HSV, and
// reduce it to a single centroid via image moments.

use crate::geometry::FrameGeometry;
use crate::mask::DialMask;
use crate::types::FrameObservation;
use crate::video::VideoReader;
use anyhow::Result;
use opencv::{
    core::{self, Mat, Scalar},
    imgproc,
    prelude::*,
};
use tracing::{debug, warn};

/// Red wraps around hue 0/180 in OpenCV's HSV, so the marker is matched by
/// two bands and their union.
fn segment_red(hsv: &Mat) -> Result<Mat> {
    let lower_red_1 = Scalar::new(0.0, 70.0, 50.0, 0.0);
    let upper_red_1 = Scalar::new(10.0, 255.0, 255.0, 0.0);
    let lower_red_2 = Scalar::new(170.0, 70.0, 50.0, 0.0);
    let upper_red_2 = Scalar::new(180.0, 255.0, 255.0, 0.0);

    let mut low_band = Mat::default();
    let mut high_band = Mat::default();
    core::in_range(hsv, &lower_red_1, &upper_red_1, &mut low_band)?;
    core::in_range(hsv, &lower_red_2, &upper_red_2, &mut high_band)?;

    let mut red = Mat::default();
    core::bitwise_or(&low_band, &high_band, &mut red, &core::no_array())?;
    Ok(red)
}

/// Locates the red marker's centroid within one decoded frame, in the ROI's
/// own coordinate frame. `None` means no red mass was detected; that frame
/// simply leaves a gap in the trace.
pub fn locate_marker(
    frame: &Mat,
    geometry: &FrameGeometry,
    mask: &DialMask,
) -> Result<Option<(i32, i32)>> {
    let roi = Mat::roi(frame, geometry.rect())?.try_clone()?;

    let mut circular_roi = Mat::default();
    core::bitwise_and(&roi, &roi, &mut circular_roi, mask.mat())?;

    let mut hsv = Mat::default();
    imgproc::cvt_color(&circular_roi, &mut hsv, imgproc::COLOR_BGR2HSV, 0)?;

    let red = segment_red(&hsv)?;

    let m = imgproc::moments(&red, false)?;
    if m.m00 == 0.0 {
        return Ok(None);
    }

    // The x centroid is reported negated; downstream graphing consumes the
    // trace with that sign. This only flips the reported coordinate, the
    // crop itself is not mirrored.
    let x = -((m.m10 / m.m00).round() as i32);
    let y = (m.m01 / m.m00).round() as i32;

    Ok(Some((x, y)))
}

/// Lazily yields one observation per frame in which the marker is visible.
///
/// The video is decoded exactly once, in stream order; consuming the
/// iterator twice would require a second decode pass. Iteration ends at end
/// of stream or on the first decode failure. Frames without red mass are
/// skipped, so frame indices in the yielded observations may have gaps.
pub struct MarkerTracker<'a> {
    reader: VideoReader,
    geometry: FrameGeometry,
    mask: &'a DialMask,
}

impl<'a> MarkerTracker<'a> {
    pub fn new(reader: VideoReader, geometry: FrameGeometry, mask: &'a DialMask) -> Self {
        Self {
            reader,
            geometry,
            mask,
        }
    }
}

impl Iterator for MarkerTracker<'_> {
    type Item = FrameObservation;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.reader.read_frame()?;
            let frame_index = self.reader.current_frame();

            if frame_index % 500 == 0 {
                debug!("Progress: frame {}", frame_index);
            }

            match locate_marker(&frame, &self.geometry, self.mask) {
                Ok(Some((x, y))) => {
                    return Some(FrameObservation {
                        x,
                        y,
                        frame: frame_index,
                    })
                }
                Ok(None) => continue,
                Err(e) => {
                    warn!("Frame {} failed: {}", frame_index, e);
                    continue;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::Point;

    /// Dark frame with an optional solid red dot, BGR like a decoded frame.
    fn synthetic_frame(width: i32, height: i32, marker: Option<Point>) -> Mat {
        let mut frame = Mat::new_rows_cols_with_default(
            height,
            width,
            core::CV_8UC3,
            Scalar::new(30.0, 30.0, 30.0, 0.0),
        )
        .unwrap();

        if let Some(center) = marker {
            imgproc::circle(
                &mut frame,
                center,
                3,
                Scalar::new(0.0, 0.0, 255.0, 0.0),
                -1,
                imgproc::LINE_8,
                0,
            )
            .unwrap();
        }

        frame
    }

    fn dial_setup(frame_height: i32, frame_width: i32) -> (DialMask, FrameGeometry) {
        let mask = DialMask::from_dimensions(50, 50).unwrap();
        let geometry =
            FrameGeometry::locate(frame_height, frame_width, mask.height(), mask.width()).unwrap();
        (mask, geometry)
    }

    #[test]
    fn test_no_red_yields_no_observation() {
        let (mask, geometry) = dial_setup(200, 200);
        let frame = synthetic_frame(200, 200, None);
        assert_eq!(locate_marker(&frame, &geometry, &mask).unwrap(), None);
    }

    #[test]
    fn test_centroid_reports_negated_column() {
        let (mask, geometry) = dial_setup(200, 200);

        // marker at (col 15, row 25) relative to the ROI origin
        let frame = synthetic_frame(
            200,
            200,
            Some(Point::new(geometry.start_x + 15, geometry.start_y + 25)),
        );

        let (x, y) = locate_marker(&frame, &geometry, &mask).unwrap().unwrap();
        assert_eq!(x, -15);
        assert_eq!(y, 25);
    }

    #[test]
    fn test_marker_outside_circular_mask_is_suppressed() {
        let (mask, geometry) = dial_setup(200, 200);

        // ROI corner pixel cluster, outside the inscribed circle
        let frame = synthetic_frame(
            200,
            200,
            Some(Point::new(geometry.start_x + 2, geometry.start_y + 2)),
        );

        assert_eq!(locate_marker(&frame, &geometry, &mask).unwrap(), None);
    }

    #[test]
    fn test_linear_motion_produces_monotonic_trace() {
        let (mask, geometry) = dial_setup(240, 320);

        let mut xs = Vec::new();
        for step in 0..10 {
            let frame = synthetic_frame(
                320,
                240,
                Some(Point::new(
                    geometry.start_x + 10 + step,
                    geometry.start_y + 25,
                )),
            );
            let (x, y) = locate_marker(&frame, &geometry, &mask).unwrap().unwrap();
            assert_eq!(y, 25);
            xs.push(x);
        }

        assert_eq!(xs.len(), 10);
        // marker moves right, reported x is negated, so the trace decreases
        assert!(xs.windows(2).all(|w| w[1] < w[0]));
    }
}
