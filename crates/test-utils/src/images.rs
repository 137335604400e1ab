//! PNG decoding and pixel inspection helpers.

use image::RgbaImage;

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Check for the PNG signature.
pub fn is_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[..8] == PNG_SIGNATURE
}

/// Decode PNG bytes into an RGBA image, panicking with context on failure.
pub fn decode_png(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .unwrap_or_else(|e| panic!("failed to decode PNG ({} bytes): {}", bytes.len(), e))
        .to_rgba8()
}

/// RGB of a pixel (alpha dropped).
pub fn rgb_at(img: &RgbaImage, x: u32, y: u32) -> (u8, u8, u8) {
    let p = img.get_pixel(x, y);
    (p[0], p[1], p[2])
}

/// Green dominates: red and blue both clearly below green.
pub fn is_greenish(rgb: (u8, u8, u8)) -> bool {
    let (r, g, b) = rgb;
    g > 150 && (r as u16) + 40 < g as u16 && (b as u16) + 40 < g as u16
}

/// Red and green both high, blue clearly lower.
pub fn is_yellowish(rgb: (u8, u8, u8)) -> bool {
    let (r, g, b) = rgb;
    r > 200 && g > 200 && (b as u16) + 60 < r as u16
}

/// Count pixels matching a predicate.
pub fn count_pixels(img: &RgbaImage, pred: impl Fn((u8, u8, u8)) -> bool) -> usize {
    img.pixels().filter(|p| pred((p[0], p[1], p[2]))).count()
}
