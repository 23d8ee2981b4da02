use image::{ImageBuffer, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Blue backdrop the chops are photographed on (hue ~221°)
pub const BACKGROUND_BLUE: Rgb<u8> = Rgb([40, 90, 200]);
/// Red-pink meat colour (hue ~356°, inside the upper red band)
pub const CHOP_RED: Rgb<u8> = Rgb([200, 60, 70]);
/// Pure red sits at hue 0, inside the lower red band
pub const PURE_RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const NEUTRAL_GRAY: Rgb<u8> = Rgb([128, 128, 128]);

/// Creates a single-colour image
pub fn uniform_image(width: u32, height: u32, color: Rgb<u8>) -> RgbImage {
    ImageBuffer::from_pixel(width, height, color)
}

/// Creates an image with a filled rectangle at (x, y) of size w x h
pub fn image_with_rect(
    width: u32,
    height: u32,
    (x, y, w, h): (u32, u32, u32, u32),
    fg: Rgb<u8>,
    bg: Rgb<u8>,
) -> RgbImage {
    ImageBuffer::from_fn(width, height, |px, py| {
        if px >= x && px < x + w && py >= y && py < y + h {
            fg
        } else {
            bg
        }
    })
}

/// Creates a chop-coloured rectangle centred on the blue backdrop
pub fn centered_chop(width: u32, height: u32, w: u32, h: u32) -> RgbImage {
    let x = (width - w) / 2;
    let y = (height - h) / 2;
    image_with_rect(width, height, (x, y, w, h), CHOP_RED, BACKGROUND_BLUE)
}

/// Paints isolated single-pixel specks onto an image
pub fn add_specks(img: &mut RgbImage, points: &[(u32, u32)], color: Rgb<u8>) {
    for &(x, y) in points {
        img.put_pixel(x, y, color);
    }
}

/// Writes an image to a temporary PNG file that is removed on drop
pub fn write_temp_png(img: &RgbImage) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// Writes an image as PNG into `dir` under `name`
pub fn write_png_in(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test image");
    path
}

/// Raw BGR buffer for an RGB image
pub fn to_bgr_buffer(img: &RgbImage) -> Vec<u8> {
    img.pixels().flat_map(|p| [p[2], p[1], p[0]]).collect()
}

pub fn is_rounded(value: f64, decimals: i32) -> bool {
    let factor = 10f64.powi(decimals);
    ((value * factor).round() / factor - value).abs() < 1e-12
}
