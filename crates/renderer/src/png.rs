//! PNG encoding for RGBA chart canvases.
//!
//! Supports two encoding modes:
//! - **Indexed PNG (color type 3)**: Used when image has ≤256 unique colors
//!   (charts rendered without a font, or flat test canvases).
//! - **RGBA PNG (color type 6)**: Fallback for images with >256 colors, which
//!   is the usual case once anti-aliased text is drawn.
//!
//! Use `create_png_auto` for automatic mode selection, or `create_png` for
//! explicit RGBA encoding.

use std::collections::HashMap;
use std::io::Write;

use doc_common::{DocError, DocResult};
use image::RgbaImage;
use rayon::prelude::*;

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Minimum pixels to benefit from parallel palette extraction
const PARALLEL_THRESHOLD: usize = 4096; // 64x64 or larger

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

type Palette = Vec<(u8, u8, u8, u8)>;

/// Encode a finished canvas.
pub fn encode_image(img: &RgbaImage) -> DocResult<Vec<u8>> {
    create_png_auto(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Create a PNG image with automatic format selection.
///
/// Analyzes the pixel data and chooses the most efficient encoding:
/// - If ≤256 unique colors: uses indexed PNG (smaller, faster)
/// - Otherwise: uses RGBA PNG (full color)
pub fn create_png_auto(pixels: &[u8], width: usize, height: usize) -> DocResult<Vec<u8>> {
    check_dimensions(pixels, width, height)?;
    let num_pixels = pixels.len() / 4;

    let palette_result = if num_pixels >= PARALLEL_THRESHOLD {
        extract_palette_parallel(pixels)
    } else {
        extract_palette_sequential(pixels)
    };

    match palette_result {
        Some((palette, indices)) => create_png_indexed(width, height, &palette, &indices),
        None => create_png(pixels, width, height),
    }
}

fn check_dimensions(pixels: &[u8], width: usize, height: usize) -> DocResult<()> {
    if width == 0 || height == 0 {
        return Err(DocError::RenderingFailure(format!(
            "cannot encode empty {}x{} image",
            width, height
        )));
    }
    if pixels.len() != width * height * 4 {
        return Err(DocError::RenderingFailure(format!(
            "pixel buffer has {} bytes, expected {} for {}x{} RGBA",
            pixels.len(),
            width * height * 4,
            width,
            height
        )));
    }
    Ok(())
}

/// Pack RGBA bytes into a u32 for faster hashing and comparison
#[inline(always)]
fn pack_color(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) | ((g as u32) << 8) | ((b as u32) << 16) | ((a as u32) << 24)
}

#[inline(always)]
fn unpack_color(packed: u32) -> (u8, u8, u8, u8) {
    (
        packed as u8,
        (packed >> 8) as u8,
        (packed >> 16) as u8,
        (packed >> 24) as u8,
    )
}

/// Sequential palette extraction for small images.
///
/// Palette order is first-seen order, so output is deterministic.
fn extract_palette_sequential(pixels: &[u8]) -> Option<(Palette, Vec<u8>)> {
    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Palette = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len() / 4);

    for chunk in pixels.chunks_exact(4) {
        let packed = pack_color(chunk[0], chunk[1], chunk[2], chunk[3]);

        let index = match color_to_index.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push((chunk[0], chunk[1], chunk[2], chunk[3]));
                color_to_index.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Parallel palette extraction for larger images.
///
/// Chunks collect their unique colours in parallel; the merge walks chunks in
/// order so the palette is the same on every run regardless of scheduling.
fn extract_palette_parallel(pixels: &[u8]) -> Option<(Palette, Vec<u8>)> {
    let chunk_size = (pixels.len() / 4 / rayon::current_num_threads()).max(256) * 4;

    // Per-chunk unique colours in first-seen order; None if a chunk alone overflows
    let per_chunk: Vec<Option<Vec<u32>>> = pixels
        .par_chunks(chunk_size)
        .map(|chunk| {
            let mut seen: HashMap<u32, ()> = HashMap::with_capacity(MAX_PALETTE_SIZE);
            let mut order = Vec::new();
            for pixel in chunk.chunks_exact(4) {
                let packed = pack_color(pixel[0], pixel[1], pixel[2], pixel[3]);
                if seen.insert(packed, ()).is_none() {
                    order.push(packed);
                    if order.len() > MAX_PALETTE_SIZE {
                        return None;
                    }
                }
            }
            Some(order)
        })
        .collect();

    let mut global_colors: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Palette = Vec::with_capacity(MAX_PALETTE_SIZE);

    for chunk_colors in per_chunk {
        for packed in chunk_colors? {
            if !global_colors.contains_key(&packed) {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                global_colors.insert(packed, palette.len() as u8);
                palette.push(unpack_color(packed));
            }
        }
    }

    let indices: Vec<u8> = pixels
        .par_chunks_exact(4)
        .map(|p| {
            global_colors
                .get(&pack_color(p[0], p[1], p[2], p[3]))
                .copied()
                .unwrap_or(0)
        })
        .collect();

    Some((palette, indices))
}

/// Create an indexed PNG (color type 3) from palette and indices.
///
/// This is more efficient than RGBA when the image has few unique colors:
/// - 1 byte per pixel instead of 4
/// - Less data to compress
/// - Smaller output file
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[(u8, u8, u8, u8)],
    indices: &[u8],
) -> DocResult<Vec<u8>> {
    if indices.len() != width * height {
        return Err(DocError::RenderingFailure(format!(
            "index buffer has {} entries, expected {}",
            indices.len(),
            width * height
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3));

    let mut plte_data = Vec::with_capacity(palette.len() * 3);
    for (r, g, b, _) in palette {
        plte_data.extend_from_slice(&[*r, *g, *b]);
    }
    write_chunk(&mut png, b"PLTE", &plte_data);

    // tRNS only if any palette entry is translucent
    if palette.iter().any(|(_, _, _, a)| *a < 255) {
        let trns_data: Vec<u8> = palette.iter().map(|(_, _, _, a)| *a).collect();
        write_chunk(&mut png, b"tRNS", &trns_data);
    }

    let idat_data = deflate_scanlines(indices, width, height)?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Create a PNG image from RGBA pixel data (color type 6).
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> DocResult<Vec<u8>> {
    check_dimensions(pixels, width, height)?;

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 6));

    let idat_data = deflate_scanlines(pixels, width * 4, height)?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// IHDR payload: 8-bit depth, no interlace.
fn ihdr(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&(width as u32).to_be_bytes());
    data.extend_from_slice(&(height as u32).to_be_bytes());
    data.push(8); // bit depth
    data.push(color_type);
    data.push(0); // compression method
    data.push(0); // filter method
    data.push(0); // interlace method
    data
}

/// Write a PNG chunk: length, type, data, CRC over type + data.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Prefix each `row_bytes`-wide scanline with filter byte 0 and zlib it.
fn deflate_scanlines(data: &[u8], row_bytes: usize, height: usize) -> DocResult<Vec<u8>> {
    let mut uncompressed = Vec::with_capacity(height * (1 + row_bytes));
    for row in data.chunks_exact(row_bytes).take(height) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(&uncompressed)
        .and_then(|_| encoder.finish())
        .map_err(|e| DocError::RenderingFailure(format!("IDAT compression failed: {}", e)))
}
