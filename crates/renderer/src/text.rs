//! TrueType text measurement and drawing for chart labels.
//!
//! Fonts are loaded at runtime. When nothing loads, text is measured with a
//! fixed-advance estimate so layout still works, and glyphs are skipped.

use std::path::Path;

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};

use doc_common::{DocError, DocResult};

/// Locations tried, in order, when no explicit font is configured.
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Advance per character, in ems, when no font is available.
const FALLBACK_ADVANCE_EM: f32 = 0.6;
/// Line height, in ems, when no font is available.
const FALLBACK_LINE_EM: f32 = 1.2;

/// Measures and draws text in pixel sizes.
#[derive(Clone)]
pub struct TextRenderer {
    font: Option<Font<'static>>,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl TextRenderer {
    /// Load `font_path` if given, otherwise the first usable system font.
    ///
    /// Never fails; a missing font degrades to measurement-only text.
    pub fn load(font_path: Option<&str>) -> Self {
        if let Some(path) = font_path {
            match Self::from_file(path) {
                Ok(renderer) => return renderer,
                Err(e) => tracing::warn!(path = %path, error = %e, "Configured font unusable, searching system fonts"),
            }
        }

        for path in SYSTEM_FONT_PATHS {
            if Path::new(path).exists() {
                if let Ok(renderer) = Self::from_file(path) {
                    tracing::debug!(path = %path, "Loaded chart font");
                    return renderer;
                }
            }
        }

        tracing::warn!("No TrueType font found; chart text will be omitted");
        Self::without_font()
    }

    pub fn from_file(path: &str) -> DocResult<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| DocError::RenderingFailure(format!("cannot read font {}: {}", path, e)))?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> DocResult<Self> {
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| DocError::RenderingFailure("invalid TrueType font data".to_string()))?;
        Ok(Self { font: Some(font) })
    }

    pub fn without_font() -> Self {
        Self { font: None }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Distance between baselines of consecutive lines.
    pub fn line_height(&self, px: f32) -> f32 {
        match &self.font {
            Some(font) => {
                let v = font.v_metrics(Scale::uniform(px));
                (v.ascent - v.descent + v.line_gap).ceil()
            }
            None => px * FALLBACK_LINE_EM,
        }
    }

    /// Width of a single line in pixels.
    pub fn line_width(&self, text: &str, px: f32) -> f32 {
        match &self.font {
            Some(font) => text_size(Scale::uniform(px), font, text).0.max(0) as f32,
            None => text.chars().count() as f32 * px * FALLBACK_ADVANCE_EM,
        }
    }

    /// (width, height) of a possibly multi-line block.
    pub fn measure(&self, text: &str, px: f32) -> (f32, f32) {
        let lines: Vec<&str> = text.lines().collect();
        let width = lines
            .iter()
            .map(|line| self.line_width(line, px))
            .fold(0.0, f32::max);
        (width, lines.len().max(1) as f32 * self.line_height(px))
    }

    /// Draw one line with its top-left corner at (x, y).
    pub fn draw_line(&self, img: &mut RgbaImage, text: &str, x: f32, y: f32, px: f32, color: Rgba<u8>) {
        if let Some(font) = &self.font {
            draw_text_mut(
                img,
                color,
                x.round() as i32,
                y.round() as i32,
                Scale::uniform(px),
                font,
                text,
            );
        }
    }

    /// Draw a block centred on (cx, cy), each line centred horizontally.
    pub fn draw_centered(&self, img: &mut RgbaImage, text: &str, cx: f32, cy: f32, px: f32, color: Rgba<u8>) {
        let (_, height) = self.measure(text, px);
        let line_height = self.line_height(px);
        let mut y = cy - height / 2.0;
        for line in text.lines() {
            let width = self.line_width(line, px);
            self.draw_line(img, line, cx - width / 2.0, y, px, color);
            y += line_height;
        }
    }

    /// Draw one line rotated a quarter turn counter-clockwise, centred on
    /// (cx, cy), over a solid `background`.
    pub fn draw_vertical(
        &self,
        img: &mut RgbaImage,
        text: &str,
        cx: f32,
        cy: f32,
        px: f32,
        color: Rgba<u8>,
        background: Rgba<u8>,
    ) {
        if self.font.is_none() {
            return;
        }
        let width = self.line_width(text, px).ceil().max(1.0) as u32;
        let height = self.line_height(px).max(1.0) as u32;

        let mut strip = RgbaImage::from_pixel(width, height, background);
        self.draw_line(&mut strip, text, 0.0, 0.0, px, color);
        let rotated = imageops::rotate270(&strip);

        let x = (cx - height as f32 / 2.0).round() as i64;
        let y = (cy - width as f32 / 2.0).round() as i64;
        imageops::replace(img, &rotated, x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_measurement() {
        let text = TextRenderer::without_font();
        assert!(!text.has_font());
        assert!((text.line_width("abcde", 20.0) - 60.0).abs() < 1e-3);
        assert!((text.line_height(20.0) - 24.0).abs() < 1e-3);
        let (w, h) = text.measure("ab\nabcd", 10.0);
        assert!((w - 24.0).abs() < 1e-3);
        assert!((h - 24.0).abs() < 1e-3);
    }

    #[test]
    fn test_bad_font_bytes() {
        assert!(TextRenderer::from_bytes(vec![0, 1, 2, 3]).is_err());
        assert!(TextRenderer::from_file("/nonexistent/font.ttf").is_err());
    }

    #[test]
    fn test_draw_without_font_is_noop() {
        let text = TextRenderer::without_font();
        let mut img = RgbaImage::from_pixel(40, 40, Rgba([255, 255, 255, 255]));
        text.draw_centered(&mut img, "hi", 20.0, 20.0, 12.0, Rgba([0, 0, 0, 255]));
        text.draw_vertical(&mut img, "hi", 20.0, 20.0, 12.0, Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 255]));
        assert!(img.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }
}
