// src/cli.rs

use anyhow::{bail, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "gforce-trace",
    version,
    about = "Extract the g-force marker trace from Garmin Catalyst footage"
)]
pub struct Cli {
    /// Data source the video came from; only `garmincatalyst` is supported
    #[arg(short = 's', long, value_name = "SOURCE")]
    pub data_source: String,

    /// Path to the source video
    #[arg(short = 'p', long, value_name = "FILE")]
    pub data_file_path: PathBuf,

    /// Path to the dial template image
    #[arg(short = 't', long, value_name = "FILE")]
    pub template_path: PathBuf,

    /// Directory where the trace JSON is written
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_path: PathBuf,
}

impl Cli {
    /// Pre-flight checks, run before any frame is decoded.
    pub fn validate(&self) -> Result<()> {
        if self.data_source != "garmincatalyst" {
            bail!(
                "unexpected data_source {}; currently, only `garmincatalyst` is allowed",
                self.data_source
            );
        }
        check_input_file(&self.data_file_path, "mp4", "video")?;
        check_input_file(&self.template_path, "png", "template image")?;
        Ok(())
    }
}

fn check_input_file(path: &Path, extension: &str, kind: &str) -> Result<()> {
    if !path.exists() {
        bail!(
            "the {} file specified, {}, does not exist",
            kind,
            path.display()
        );
    }
    if path.extension().and_then(|e| e.to_str()) != Some(extension) {
        bail!(
            "{} file {} should be a .{} file",
            kind,
            path.display(),
            extension
        );
    }
    if fs::metadata(path)?.len() == 0 {
        bail!("{} file {} is empty", kind, path.display());
    }
    Ok(())
}
