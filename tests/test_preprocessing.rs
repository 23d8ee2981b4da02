//! Tests for colour conversion, masking, morphology, contours and scoring helpers.

mod common;

use chopfinder::detection::{contours, morphology, preprocessing, scoring};
use chopfinder::{BoundingRect, Contour};
use common::*;
use image::{GrayImage, Luma, Rgb};
use imageproc::point::Point;

#[test]
fn test_rgb_to_hsv_eight_bit_convention() {
    assert_eq!(preprocessing::rgb_to_hsv(&Rgb([255, 0, 0])), [0, 255, 255]);
    assert_eq!(preprocessing::rgb_to_hsv(&Rgb([0, 255, 0])), [60, 255, 255]);
    assert_eq!(preprocessing::rgb_to_hsv(&Rgb([0, 0, 255])), [120, 255, 255]);
    assert_eq!(preprocessing::rgb_to_hsv(&Rgb([128, 128, 128])), [0, 0, 128]);
    assert_eq!(preprocessing::rgb_to_hsv(&Rgb([0, 0, 0])), [0, 0, 0]);

    let [h, s, v] = preprocessing::rgb_to_hsv(&CHOP_RED);
    assert_eq!(h, 178);
    assert!(s > 170 && v == 200);
}

#[test]
fn test_color_mask_selects_both_red_bands() {
    let mut img = uniform_image(4, 1, BACKGROUND_BLUE);
    img.put_pixel(0, 0, PURE_RED);
    img.put_pixel(1, 0, CHOP_RED);
    img.put_pixel(2, 0, Rgb([60, 20, 20])); // dark red, V = 60 is above the floor
    img.put_pixel(3, 0, Rgb([40, 15, 15])); // V = 40 is below it

    let mask = preprocessing::color_mask(&img, &DetectorConfig::default().hue_ranges);

    let values: Vec<u8> = mask.pixels().map(|p| p[0]).collect();
    assert_eq!(values, vec![255, 255, 255, 0]);
    assert_eq!(preprocessing::foreground_count(&mask), 3);
}

#[test]
fn test_normalize_channels() -> anyhow::Result<()> {
    let bgr = vec![0u8, 0, 255, 255, 0, 0];

    let img = preprocessing::normalize_channels(bgr.clone(), 2, 1, ChannelOrder::Bgr)?;
    assert_eq!(img.get_pixel(0, 0), &Rgb([255, 0, 0]));
    assert_eq!(img.get_pixel(1, 0), &Rgb([0, 0, 255]));

    let img = preprocessing::normalize_channels(bgr, 2, 1, ChannelOrder::Rgb)?;
    assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 255]));

    assert!(preprocessing::normalize_channels(vec![0u8; 5], 2, 1, ChannelOrder::Rgb).is_err());
    assert!(preprocessing::normalize_channels(Vec::new(), 0, 3, ChannelOrder::Rgb).is_err());
    Ok(())
}

#[test]
fn test_clean_mask_removes_specks_and_fills_holes() {
    let mut mask = GrayImage::new(60, 60);
    for y in 10..50 {
        for x in 10..50 {
            mask.put_pixel(x, y, Luma([255]));
        }
    }
    mask.put_pixel(30, 30, Luma([0])); // hole
    mask.put_pixel(2, 2, Luma([255])); // speck

    let cleaned = morphology::clean_mask(&mask, &MorphologyConfig::default());

    assert_eq!(cleaned.get_pixel(30, 30)[0], 255);
    assert_eq!(cleaned.get_pixel(2, 2)[0], 0);
    assert_eq!(cleaned.get_pixel(10, 10)[0], 255);
    assert_eq!(cleaned.get_pixel(49, 49)[0], 255);
    assert_eq!(cleaned.get_pixel(9, 30)[0], 0);
}

#[test]
fn test_outer_contours_ignore_holes() {
    let mut mask = GrayImage::new(40, 40);
    for y in 5..35 {
        for x in 5..35 {
            let ring = x < 10 || x >= 30 || y < 10 || y >= 30;
            if ring {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
    }

    let found = contours::find_outer_contours(&mask);
    assert_eq!(found.len(), 1);

    let (largest, area) = contours::largest_contour(found).expect("one contour");
    assert_eq!(area, 29.0 * 29.0);
    assert_eq!(
        largest.bounding_rect(),
        Some(BoundingRect { x: 5, y: 5, width: 30, height: 30 })
    );
}

#[test]
fn test_largest_contour_empty() {
    assert!(contours::largest_contour(Vec::new()).is_none());
    assert!(contours::find_outer_contours(&GrayImage::new(10, 10)).is_empty());
}

#[test]
fn test_contour_area_shoelace() {
    let square = Contour::new(vec![
        Point::new(0, 0),
        Point::new(4, 0),
        Point::new(4, 3),
        Point::new(0, 3),
    ]);
    assert_eq!(square.area(), 12.0);

    let reversed = Contour::new(square.points.iter().rev().copied().collect());
    assert_eq!(reversed.area(), 12.0);

    let line = Contour::new(vec![Point::new(0, 0), Point::new(5, 0)]);
    assert_eq!(line.area(), 0.0);
    assert!(Contour::new(Vec::new()).bounding_rect().is_none());
}

#[test]
fn test_area_confidence_shape() {
    let config = DetectorConfig::default();

    assert_eq!(scoring::area_confidence(0.4, &config), 1.0);
    assert!(scoring::area_confidence(0.0, &config).abs() < 1e-12);
    assert!(scoring::area_confidence(0.8, &config).abs() < 1e-12);
    assert!((scoring::area_confidence(0.2, &config) - 0.5).abs() < 1e-12);
    assert_eq!(scoring::area_confidence(0.95, &config), 0.0);
}

#[test]
fn test_aspect_confidence_shape() {
    let config = DetectorConfig::default();

    assert_eq!(scoring::aspect_confidence(0.8, &config), 1.0);
    assert_eq!(scoring::aspect_confidence(2.0, &config), 1.0);
    assert!((scoring::aspect_confidence(3.0, &config) - 0.2).abs() < 1e-12);
    assert!((scoring::aspect_confidence(0.5, &config) - 0.55).abs() < 1e-12);
    assert_eq!(scoring::aspect_confidence(10.0, &config), 0.0);
}

#[test]
fn test_zero_height_rect_defaults_to_square_aspect() {
    let rect = BoundingRect { x: 0, y: 0, width: 10, height: 0 };
    assert_eq!(rect.aspect_ratio(), 1.0);
}

#[test]
fn test_expand_with_margin() {
    let rect = BoundingRect { x: 20, y: 30, width: 40, height: 25 };
    assert_eq!(scoring::expand_with_margin(&rect, 0.05, 100, 100), (18, 29, 62, 56));

    // margin truncates to zero for small boxes
    let small = BoundingRect { x: 5, y: 5, width: 10, height: 10 };
    assert_eq!(scoring::expand_with_margin(&small, 0.05, 100, 100), (5, 5, 15, 15));

    let edge = BoundingRect { x: 0, y: 0, width: 100, height: 80 };
    assert_eq!(scoring::expand_with_margin(&edge, 0.05, 100, 80), (0, 0, 100, 80));
}

#[test]
fn test_round_to() {
    assert_eq!(scoring::round_to(0.996125, 2), 1.0);
    assert_eq!(scoring::round_to(0.12344, 4), 0.1234);

    // the stored binary value decides, not the scaled product
    assert_eq!(scoring::round_to(0.175, 2), 0.17);
    assert_eq!(scoring::round_to(0.05125, 4), 0.0512);

    // exact ties go to even
    assert_eq!(scoring::round_to(0.125, 2), 0.12);
    assert_eq!(scoring::round_to(0.5, 0), 0.0);
    assert_eq!(scoring::round_to(1.5, 0), 2.0);
}
