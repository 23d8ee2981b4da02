use anyhow::{Result, anyhow};
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};

use crate::models::DetectionResult;

/// Debug configuration for detector runs
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

impl DebugConfig {
    /// The directory must be empty or non-existent
    pub fn new(output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        Ok(Self { output_dir })
    }

    /// Directory holding the dumps of one detection call
    pub fn run_dir(&self, label: &str) -> Result<PathBuf> {
        let dir = self.output_dir.join(sanitize_label(label));
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

/// Turn an arbitrary source name into a single safe path component
fn sanitize_label(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect();
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        "image".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn save_rgb(dir: &Path, name: &str, img: &RgbImage) -> Result<()> {
    img.save(dir.join(name))
        .map_err(|e| anyhow!("Failed to save debug image {}: {}", name, e))
}

pub fn save_mask(dir: &Path, name: &str, mask: &GrayImage) -> Result<()> {
    mask.save(dir.join(name))
        .map_err(|e| anyhow!("Failed to save debug mask {}: {}", name, e))
}

/// Save the input with the detected box outlined in green
pub fn save_overlay(dir: &Path, name: &str, img: &RgbImage, result: &DetectionResult) -> Result<()> {
    let mut canvas = img.clone();
    let rect = Rect::at(result.x1 as i32, result.y1 as i32).of_size(result.width(), result.height());
    draw_hollow_rect_mut(&mut canvas, rect, Rgb([0u8, 255u8, 0u8]));
    save_rgb(dir, name, &canvas)
}
