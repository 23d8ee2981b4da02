use super::config::DetectorConfig;
use crate::models::BoundingRect;

/// Round to a fixed number of decimal places.
///
/// Goes through decimal formatting so the exact binary value decides the
/// digit and exact ties go to even, rather than scaling by a power of ten.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

/// Peaks at the ideal ratio, falls linearly to 0 at 0 and at twice the ideal
pub fn area_confidence(area_ratio: f64, config: &DetectorConfig) -> f64 {
    let ideal = config.ideal_area_ratio;
    (1.0 - (ideal - area_ratio).abs() / ideal).clamp(0.0, 1.0)
}

/// 1.0 inside the accepted aspect band, linear falloff around the ideal otherwise
pub fn aspect_confidence(aspect_ratio: f64, config: &DetectorConfig) -> f64 {
    if (config.min_aspect_ratio..=config.max_aspect_ratio).contains(&aspect_ratio) {
        return 1.0;
    }
    (1.0 - (aspect_ratio - config.ideal_aspect_ratio).abs() / config.aspect_falloff).clamp(0.0, 1.0)
}

/// Combined confidence, rounded to two decimals
pub fn confidence(area_ratio: f64, rect: &BoundingRect, config: &DetectorConfig) -> f64 {
    let area = area_confidence(area_ratio, config);
    let aspect = aspect_confidence(rect.aspect_ratio(), config);
    round_to((area + aspect) / 2.0, 2)
}

/// Grow the rectangle by `margin` of its size on each side, clipped to the image.
///
/// Returns `(x1, y1, x2, y2)` with exclusive right/bottom edges.
pub fn expand_with_margin(
    rect: &BoundingRect,
    margin: f64,
    width: u32,
    height: u32,
) -> (u32, u32, u32, u32) {
    let margin_x = (rect.width as f64 * margin).floor() as u32;
    let margin_y = (rect.height as f64 * margin).floor() as u32;

    let x1 = rect.x.saturating_sub(margin_x);
    let y1 = rect.y.saturating_sub(margin_y);
    let x2 = (rect.x + rect.width + margin_x).min(width);
    let y2 = (rect.y + rect.height + margin_y).min(height);

    (x1, y1, x2, y2)
}
