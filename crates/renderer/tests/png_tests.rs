//! Tests for PNG encoding functionality.
//!
//! Encoded output is decoded with the `image` crate to check it is a valid
//! PNG carrying the same pixels, in both indexed and RGBA modes.

use renderer::png::{create_png, create_png_auto, encode_image};
use test_utils::{decode_png, is_png};

// ============================================================================
// Helper functions
// ============================================================================

/// Flat two-colour split like an untexted DOC chart.
fn chart_like_pixels(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            // rop grows upward: row 0 is the top
            let rop = (height - 1 - y) as f64;
            let rpm = x as f64;
            if rop > 0.75 * rpm {
                pixels.extend_from_slice(&[91, 215, 91, 255]);
            } else {
                pixels.extend_from_slice(&[255, 255, 51, 255]);
            }
        }
    }
    pixels
}

/// Every pixel a distinct colour, forcing the RGBA path.
fn many_color_pixels(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for i in 0..(width * height) {
        pixels.extend_from_slice(&[(i % 256) as u8, ((i / 256) % 256) as u8, 128, 255]);
    }
    pixels
}

fn color_type(png: &[u8]) -> u8 {
    png[25]
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn test_indexed_roundtrip_preserves_pixels() {
    let (w, h) = (120, 80);
    let pixels = chart_like_pixels(w, h);
    let png = create_png_auto(&pixels, w, h).unwrap();

    assert!(is_png(&png));
    assert_eq!(color_type(&png), 3);
    let img = decode_png(&png);
    assert_eq!(img.dimensions(), (w as u32, h as u32));
    assert_eq!(img.as_raw(), &pixels);
}

#[test]
fn test_rgba_fallback_many_colors() {
    let (w, h) = (64, 64);
    let pixels = many_color_pixels(w, h);
    let png = create_png_auto(&pixels, w, h).unwrap();

    assert_eq!(color_type(&png), 6);
    assert_eq!(decode_png(&png).as_raw(), &pixels);
}

#[test]
fn test_large_image_parallel_extraction() {
    // Above the parallel threshold; output must match the small-image path
    let (w, h) = (400, 300);
    let pixels = chart_like_pixels(w, h);
    let a = create_png_auto(&pixels, w, h).unwrap();
    let b = create_png_auto(&pixels, w, h).unwrap();
    assert_eq!(a, b);
    assert_eq!(decode_png(&a).as_raw(), &pixels);
}

#[test]
fn test_indexed_smaller_than_rgba() {
    let (w, h) = (256, 256);
    let pixels = chart_like_pixels(w, h);
    let indexed = create_png_auto(&pixels, w, h).unwrap();
    let rgba = create_png(&pixels, w, h).unwrap();
    assert!(indexed.len() < rgba.len());
}

#[test]
fn test_translucent_palette_survives() {
    let pixels = [
        255, 0, 0, 128, //
        0, 0, 0, 0, //
        255, 0, 0, 128, //
        0, 0, 255, 255,
    ];
    let png = create_png_auto(&pixels, 2, 2).unwrap();
    assert_eq!(decode_png(&png).as_raw(), &pixels.to_vec());
}

#[test]
fn test_encode_image() {
    let img = image::RgbaImage::from_pixel(10, 7, image::Rgba([1, 2, 3, 255]));
    let png = encode_image(&img).unwrap();
    assert_eq!(decode_png(&png), img);
}

#[test]
fn test_single_pixel() {
    let png = create_png(&[10, 20, 30, 255], 1, 1).unwrap();
    assert_eq!(decode_png(&png).get_pixel(0, 0).0, [10, 20, 30, 255]);
}

#[test]
fn test_size_mismatch_is_rendering_failure() {
    let err = create_png(&[0u8; 8], 3, 1).unwrap_err();
    assert_eq!(err.error_code(), "RenderingFailure");
}
