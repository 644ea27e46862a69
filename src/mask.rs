// src/mask.rs

use anyhow::Result;
use opencv::{
    core::{self, Mat, Point, Scalar},
    imgcodecs, imgproc,
    prelude::*,
};
use std::path::Path;
use tracing::info;

/// Circular mask cut from the dial template. Built once per run and shared
/// read-only by every frame; its dimensions double as the ROI size.
pub struct DialMask {
    mask: Mat,
    width: i32,
    height: i32,
}

impl DialMask {
    pub fn from_template(path: &Path) -> Result<Self> {
        let template = imgcodecs::imread(&path.to_string_lossy(), imgcodecs::IMREAD_COLOR)?;
        if template.empty() {
            anyhow::bail!(
                "template image {} could not be decoded",
                path.display()
            );
        }

        info!(
            "Template loaded: {}x{}",
            template.cols(),
            template.rows()
        );

        Self::from_dimensions(template.rows(), template.cols())
    }

    /// The circle is anchored at half the template *height* on both axes;
    /// Catalyst dial templates are square, so width plays no part in the
    /// center. Non-square templates keep this anchoring.
    pub fn from_dimensions(height: i32, width: i32) -> Result<Self> {
        if height <= 0 || width <= 0 {
            anyhow::bail!("template has degenerate dimensions {}x{}", width, height);
        }

        let mut mask = Mat::zeros(height, width, core::CV_8UC1)?.to_mat()?;
        let center = Point::new(height / 2, height / 2);
        let radius = width.min(height) / 2;

        imgproc::circle(
            &mut mask,
            center,
            radius,
            Scalar::new(255.0, 255.0, 255.0, 0.0),
            -1,
            imgproc::LINE_8,
            0,
        )?;

        Ok(Self {
            mask,
            width,
            height,
        })
    }

    pub fn mat(&self) -> &Mat {
        &self.mask
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }
}
