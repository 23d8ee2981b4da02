//! Detector thresholds
//!
//! Every numeric policy the detector applies lives here so callers can
//! override it without touching the algorithm. `Default` reproduces the
//! values the detector was tuned with on pink/red chops photographed
//! against a blue background.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Inclusive HSV bounds, 8-bit convention: H in [0, 180], S and V in [0, 255]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub h_min: u8,
    pub h_max: u8,
    pub s_min: u8,
    pub s_max: u8,
    pub v_min: u8,
    pub v_max: u8,
}

impl HsvRange {
    pub fn new(h_min: u8, h_max: u8, s_min: u8, s_max: u8, v_min: u8, v_max: u8) -> Self {
        Self {
            h_min,
            h_max,
            s_min,
            s_max,
            v_min,
            v_max,
        }
    }

    #[inline]
    pub fn contains(&self, [h, s, v]: [u8; 3]) -> bool {
        (self.h_min..=self.h_max).contains(&h)
            && (self.s_min..=self.s_max).contains(&s)
            && (self.v_min..=self.v_max).contains(&v)
    }
}

/// Opening/closing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphologyConfig {
    /// Side length of the square structuring element (odd)
    pub kernel_size: u8,
    pub iterations: u8,
}

impl MorphologyConfig {
    /// Chebyshev radius equivalent to `iterations` passes of the square kernel
    pub fn radius(&self) -> u8 {
        (self.kernel_size / 2).saturating_mul(self.iterations)
    }
}

impl Default for MorphologyConfig {
    fn default() -> Self {
        Self {
            kernel_size: 5,
            iterations: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Hue bands treated as chop colour, combined with OR
    pub hue_ranges: Vec<HsvRange>,
    pub morphology: MorphologyConfig,
    pub min_area_ratio: f64,
    pub max_area_ratio: f64,
    /// Area ratio at which area confidence peaks
    pub ideal_area_ratio: f64,
    pub min_aspect_ratio: f64,
    pub max_aspect_ratio: f64,
    /// Centre of the aspect confidence falloff outside the accepted band
    pub ideal_aspect_ratio: f64,
    pub aspect_falloff: f64,
    /// Fraction of the contour box added on each side
    pub margin: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            hue_ranges: vec![
                HsvRange::new(0, 20, 30, 255, 50, 255),
                HsvRange::new(160, 180, 30, 255, 50, 255),
            ],
            morphology: MorphologyConfig::default(),
            min_area_ratio: 0.05,
            max_area_ratio: 0.80,
            ideal_area_ratio: 0.4,
            min_aspect_ratio: 0.8,
            max_aspect_ratio: 2.0,
            ideal_aspect_ratio: 1.4,
            aspect_falloff: 2.0,
            margin: 0.05,
        }
    }
}

impl DetectorConfig {
    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_area_bounds(mut self, min_area_ratio: f64, max_area_ratio: f64) -> Self {
        self.min_area_ratio = min_area_ratio;
        self.max_area_ratio = max_area_ratio;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.hue_ranges.is_empty() {
            return Err(anyhow!("At least one hue range is required"));
        }
        for range in &self.hue_ranges {
            if range.h_min > range.h_max || range.s_min > range.s_max || range.v_min > range.v_max {
                return Err(anyhow!("Inverted hue range bounds: {:?}", range));
            }
        }
        if self.morphology.kernel_size == 0 || self.morphology.kernel_size % 2 == 0 {
            return Err(anyhow!(
                "Structuring element size must be odd and non-zero, got {}",
                self.morphology.kernel_size
            ));
        }
        if self.morphology.iterations == 0 {
            return Err(anyhow!("Morphology iterations must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.min_area_ratio)
            || !(0.0..=1.0).contains(&self.max_area_ratio)
            || self.min_area_ratio > self.max_area_ratio
        {
            return Err(anyhow!(
                "Invalid area bounds: [{}, {}]",
                self.min_area_ratio,
                self.max_area_ratio
            ));
        }
        if self.ideal_area_ratio <= 0.0 {
            return Err(anyhow!("ideal_area_ratio must be positive"));
        }
        if self.min_aspect_ratio > self.max_aspect_ratio || self.aspect_falloff <= 0.0 {
            return Err(anyhow!(
                "Invalid aspect settings: [{}, {}] falloff {}",
                self.min_aspect_ratio,
                self.max_aspect_ratio,
                self.aspect_falloff
            ));
        }
        if !(0.0..1.0).contains(&self.margin) {
            return Err(anyhow!("margin must be in [0, 1), got {}", self.margin));
        }
        Ok(())
    }
}
