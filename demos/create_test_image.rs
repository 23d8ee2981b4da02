use image::{Rgb, RgbImage};

fn main() {
    let (width, height) = (800u32, 600u32);
    let mut img = RgbImage::new(width, height);

    // Blue backdrop with a slight vertical lighting gradient
    for y in 0..height {
        for x in 0..width {
            let shade = (y * 40 / height) as u8;
            img.put_pixel(x, y, Rgb([30 + shade, 80 + shade, 190 + shade / 2]));
        }
    }

    // Pink chop: an ellipse covering roughly a third of the frame
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let (rx, ry) = (260.0f32, 170.0f32);
    for y in 0..height {
        for x in 0..width {
            let dx = (x as f32 - cx) / rx;
            let dy = (y as f32 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                let fat = ((x / 7 + y / 11) % 13 == 0) as u8;
                img.put_pixel(x, y, Rgb([215, 110 + fat * 60, 120 + fat * 50]));
            }
        }
    }

    img.save("test_chop.png").unwrap();
    println!("Created test_chop.png (800x600 pink ellipse on blue)");
}
