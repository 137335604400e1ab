//! Style configuration for DOC chart rendering.

use serde::{Deserialize, Serialize};

use doc_common::{DocError, DocResult};

/// An opaque RGB colour, (de)serialised as a `#RRGGBB` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Composite this colour at `alpha` over an opaque `background`.
    pub fn over(self, background: Rgb, alpha: f32) -> Rgb {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f32 * a + bg as f32 * (1.0 - a)).round() as u8;
        Rgb::new(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }

    pub fn to_rgba(self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        hex_to_rgb(&value)
            .map(|(r, g, b)| Rgb::new(r, g, b))
            .ok_or_else(|| format!("invalid hex colour '{}'", value))
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        format!("#{:02X}{:02X}{:02X}", c.r, c.g, c.b)
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Visual configuration for a DOC chart.
///
/// Everything here is presentation; the numeric inputs live in
/// [`doc_common::ChartSpec`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Pixels per inch; converts point font sizes to pixels
    pub dpi: f32,
    /// Fill for the high-DOC side of the boundary (DOC > threshold)
    pub above_color: Rgb,
    /// Fill for the low-DOC side of the boundary (DOC <= threshold)
    pub below_color: Rgb,
    /// Opacity of region fills and annotation boxes over the white background
    pub region_alpha: f32,
    pub background: Rgb,
    pub boundary_color: Rgb,
    /// Boundary stroke width in pixels
    pub boundary_width: f32,
    pub grid_color: Rgb,
    pub grid_alpha: f32,
    /// Tick label size in points
    pub tick_font_size: f32,
    /// Spacing of iso-DOC guide lines in in/rev; `None` disables them
    pub guide_interval: Option<f64>,
    pub guide_color: Rgb,
    /// Explicit TrueType font; system locations are searched when unset
    pub font_path: Option<String>,
    /// General padding in pixels
    pub padding: f32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            dpi: 100.0,
            above_color: Rgb::new(0x32, 0xCD, 0x32), // limegreen
            below_color: Rgb::new(0xFF, 0xFF, 0x00), // yellow
            region_alpha: 0.8,
            background: Rgb::WHITE,
            boundary_color: Rgb::BLACK,
            boundary_width: 2.0,
            grid_color: Rgb::new(0xB0, 0xB0, 0xB0),
            grid_alpha: 0.7,
            tick_font_size: 14.0,
            guide_interval: None,
            guide_color: Rgb::new(0x40, 0x40, 0x40),
            font_path: None,
            padding: 12.0,
        }
    }
}

impl ChartStyle {
    /// Load style configuration from JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Load style configuration from file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    /// Convert a size in points to pixels at this style's dpi.
    pub fn pt_to_px(&self, points: f32) -> f32 {
        points * self.dpi / 72.0
    }

    /// Opaque fill colour for the high-DOC region.
    pub fn above_fill(&self) -> Rgb {
        self.above_color.over(self.background, self.region_alpha)
    }

    /// Opaque fill colour for the low-DOC region.
    pub fn below_fill(&self) -> Rgb {
        self.below_color.over(self.background, self.region_alpha)
    }

    /// Reject styles that cannot produce a sensible image.
    pub fn validate(&self) -> DocResult<()> {
        if self.width < 200 || self.height < 150 {
            return Err(DocError::invalid_parameter(
                "width/height",
                format!("canvas {}x{} is too small (min 200x150)", self.width, self.height),
            ));
        }
        if self.width > 8192 || self.height > 8192 {
            return Err(DocError::invalid_parameter(
                "width/height",
                format!("canvas {}x{} is too large (max 8192x8192)", self.width, self.height),
            ));
        }
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(DocError::invalid_parameter("dpi", "must be positive"));
        }
        if let Some(interval) = self.guide_interval {
            if !(interval.is_finite() && interval > 0.0) {
                return Err(DocError::invalid_parameter(
                    "guide_interval",
                    format!("must be positive, got {}", interval),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#FF0000"), Some((255, 0, 0)));
        assert_eq!(hex_to_rgb("32CD32"), Some((50, 205, 50)));
        assert_eq!(hex_to_rgb("#GGGGGG"), None);
        assert_eq!(hex_to_rgb("#FFF"), None);
    }

    #[test]
    fn test_region_fills_blend_over_white() {
        let style = ChartStyle::default();
        assert_eq!(style.above_fill(), Rgb::new(91, 215, 91));
        assert_eq!(style.below_fill(), Rgb::new(255, 255, 51));
    }

    #[test]
    fn test_style_from_json_partial() {
        let style = ChartStyle::from_json(r##"{"width": 640, "height": 480, "above_color": "#00FF00"}"##)
            .unwrap();
        assert_eq!(style.width, 640);
        assert_eq!(style.above_color, Rgb::new(0, 255, 0));
        assert_eq!(style.below_color, ChartStyle::default().below_color);
    }

    #[test]
    fn test_style_rejects_bad_colour() {
        assert!(ChartStyle::from_json(r#"{"above_color": "green"}"#).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(ChartStyle::default().validate().is_ok());
        let tiny = ChartStyle {
            width: 10,
            ..ChartStyle::default()
        };
        assert!(tiny.validate().is_err());
        let bad_guides = ChartStyle {
            guide_interval: Some(0.0),
            ..ChartStyle::default()
        };
        assert!(bad_guides.validate().is_err());
    }
}
