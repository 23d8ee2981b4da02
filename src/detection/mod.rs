pub mod config;
pub mod contours;
pub mod morphology;
pub mod preprocessing;
pub mod scoring;

use anyhow::{Result, anyhow};
use image::{DynamicImage, GrayImage, RgbImage};
use tracing::{debug, warn};

use crate::debug::{self as dump, DebugConfig};
use crate::models::{Detection, DetectionResult};
pub use config::{DetectorConfig, HsvRange, MorphologyConfig};
pub use preprocessing::ChannelOrder;

/// Colour-segmentation chop detector.
///
/// Stateless apart from its configuration: `detect` takes `&self` and the
/// same detector can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ChopDetector {
    pub config: DetectorConfig,
    pub debug: Option<DebugConfig>,
}

impl ChopDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the thresholds; inconsistent configurations are rejected
    pub fn with_config(mut self, config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Enable debug dumps under `output_dir`, which must be empty or absent
    pub fn with_debug(mut self, output_dir: std::path::PathBuf) -> Result<Self> {
        self.debug = Some(DebugConfig::new(output_dir)?);
        Ok(self)
    }

    /// Locate the chop in an RGB image
    pub fn detect(&self, img: &RgbImage) -> Detection {
        self.detect_with_label(img, "image")
    }

    /// Same as [`detect`](Self::detect); `label` names the debug dump directory
    pub fn detect_with_label(&self, img: &RgbImage, label: &str) -> Detection {
        match self.try_detect(img, label) {
            Ok(detection) => detection,
            Err(e) => {
                warn!(label, error = %e, "Detection failed");
                Detection::NotDetected
            }
        }
    }

    pub fn detect_dynamic(&self, img: &DynamicImage) -> Detection {
        self.detect(&img.to_rgb8())
    }

    /// Detect on a raw interleaved 3-channel buffer
    pub fn detect_raw(&self, buffer: Vec<u8>, width: u32, height: u32, order: ChannelOrder) -> Detection {
        match preprocessing::normalize_channels(buffer, width, height, order) {
            Ok(img) => self.detect(&img),
            Err(e) => {
                warn!(error = %e, "Rejected raw buffer");
                Detection::NotDetected
            }
        }
    }

    /// Binary colour mask after opening/closing (for debugging)
    pub fn get_mask(&self, img: &RgbImage) -> GrayImage {
        let raw = preprocessing::color_mask(img, &self.config.hue_ranges);
        morphology::clean_mask(&raw, &self.config.morphology)
    }

    fn try_detect(&self, img: &RgbImage, label: &str) -> Result<Detection> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(anyhow!("Image has zero area: {}x{}", width, height));
        }

        let dump_dir = match &self.debug {
            Some(cfg) => match cfg.run_dir(label) {
                Ok(dir) => Some(dir),
                Err(e) => {
                    warn!(label, error = %e, "Debug directory unavailable");
                    None
                }
            },
            None => None,
        };

        // Step 1-2: HSV colour mask
        let raw_mask = preprocessing::color_mask(img, &self.config.hue_ranges);
        debug!(
            label,
            pixels = preprocessing::foreground_count(&raw_mask),
            "Colour mask built"
        );

        // Step 3: opening then closing
        let mask = morphology::clean_mask(&raw_mask, &self.config.morphology);
        debug!(
            label,
            pixels = preprocessing::foreground_count(&mask),
            "Mask cleaned"
        );

        if let Some(dir) = &dump_dir {
            let saved = dump::save_rgb(dir, "00_input.png", img)
                .and_then(|_| dump::save_mask(dir, "01_mask.png", &raw_mask))
                .and_then(|_| dump::save_mask(dir, "02_cleaned.png", &mask));
            if let Err(e) = saved {
                warn!(label, error = %e, "Failed to write debug output");
            }
        }

        // Step 4-5: largest outer contour
        let all_contours = contours::find_outer_contours(&mask);
        debug!(label, count = all_contours.len(), "Found contours");

        let Some((contour, area)) = contours::largest_contour(all_contours) else {
            return Ok(Detection::NotDetected);
        };

        // Step 6: area filter
        let area_ratio = area / (width as f64 * height as f64);
        if area_ratio < self.config.min_area_ratio || area_ratio > self.config.max_area_ratio {
            debug!(label, area_ratio, "Largest region outside accepted area range");
            return Ok(Detection::NotDetected);
        }

        // Step 7: bounding box with margin
        let rect = contour
            .bounding_rect()
            .ok_or_else(|| anyhow!("Contour has no points"))?;
        let (x1, y1, x2, y2) = scoring::expand_with_margin(&rect, self.config.margin, width, height);
        if x1 >= x2 || y1 >= y2 {
            return Err(anyhow!("Degenerate bounding box ({}, {}, {}, {})", x1, y1, x2, y2));
        }

        // Step 8: confidence
        let confidence = scoring::confidence(area_ratio, &rect, &self.config);

        let result = DetectionResult {
            x1,
            y1,
            x2,
            y2,
            confidence,
            area_ratio: scoring::round_to(area_ratio, 4),
        };
        debug!(label, ?result, "Chop detected");

        if let Some(dir) = &dump_dir {
            if let Err(e) = dump::save_overlay(dir, "03_detection.png", img, &result) {
                warn!(label, error = %e, "Failed to write debug output");
            }
        }

        Ok(Detection::Detected(result))
    }
}
