use anyhow::{Result, anyhow};
use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use palette::{FromColor, Hsv, Srgb};

use super::config::HsvRange;

/// Interleaved channel layout of a raw pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

/// Wrap a raw 3-channel buffer as an RGB image, swapping channels if needed
pub fn normalize_channels(
    buffer: Vec<u8>,
    width: u32,
    height: u32,
    order: ChannelOrder,
) -> Result<RgbImage> {
    if width == 0 || height == 0 {
        return Err(anyhow!("Image has zero area: {}x{}", width, height));
    }

    let mut buffer = buffer;
    if order == ChannelOrder::Bgr {
        for px in buffer.chunks_exact_mut(3) {
            px.swap(0, 2);
        }
    }

    let expected = width as usize * height as usize * 3;
    let actual = buffer.len();
    ImageBuffer::from_raw(width, height, buffer).ok_or_else(|| {
        anyhow!(
            "Buffer length {} does not match {}x{}x3 = {}",
            actual,
            width,
            height,
            expected
        )
    })
}

/// Convert one RGB pixel to 8-bit HSV: H = degrees / 2, S and V scaled to 255
#[inline]
pub fn rgb_to_hsv(pixel: &Rgb<u8>) -> [u8; 3] {
    let [r, g, b] = pixel.0;
    let hsv: Hsv = Hsv::from_color(Srgb::new(r, g, b).into_format::<f32>());

    let h = (hsv.hue.into_positive_degrees() / 2.0).round();
    let s = (hsv.saturation * 255.0).round();
    let v = (hsv.value * 255.0).round();

    [
        h.clamp(0.0, 180.0) as u8,
        s.clamp(0.0, 255.0) as u8,
        v.clamp(0.0, 255.0) as u8,
    ]
}

/// Binary mask (0/255) of pixels falling inside any of the given HSV ranges
pub fn color_mask(img: &RgbImage, ranges: &[HsvRange]) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut mask = GrayImage::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let hsv = rgb_to_hsv(pixel);
        if ranges.iter().any(|range| range.contains(hsv)) {
            mask.put_pixel(x, y, Luma([255u8]));
        }
    }

    mask
}

/// Number of foreground pixels in a mask
pub fn foreground_count(mask: &GrayImage) -> u64 {
    mask.pixels().filter(|p| p[0] > 0).count() as u64
}
