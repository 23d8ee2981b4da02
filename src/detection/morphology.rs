use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close_mut, open_mut};

use super::config::MorphologyConfig;

/// Remove specks with an opening, then fill holes with a closing.
///
/// Repeated passes of a square kernel of side `2r + 1` equal a single pass
/// within Chebyshev distance `r * iterations`, so both operations run once
/// with the combined radius.
pub fn clean_mask(mask: &GrayImage, config: &MorphologyConfig) -> GrayImage {
    let radius = config.radius();
    let mut cleaned = mask.clone();
    if radius == 0 {
        return cleaned;
    }

    open_mut(&mut cleaned, Norm::LInf, radius);
    close_mut(&mut cleaned, Norm::LInf, radius);
    cleaned
}
