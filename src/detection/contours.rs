use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};

use crate::models::Contour;

/// Outer borders of the top-level connected regions in a binary mask
pub fn find_outer_contours(mask: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| Contour::new(c.points))
        .collect()
}

/// Contour with the largest enclosed area; the first one wins ties
pub fn largest_contour(contours: Vec<Contour>) -> Option<(Contour, f64)> {
    let mut best: Option<(Contour, f64)> = None;

    for contour in contours {
        let area = contour.area();
        match &best {
            Some((_, best_area)) if *best_area >= area => {}
            _ => best = Some((contour, area)),
        }
    }

    best
}
