//! Plot rectangle placement, data-to-pixel mapping, and axis ticks.

use doc_common::{AxisRange, BoundarySegment, DataPoint};

use crate::contour::generate_contour_levels;
use crate::style::ChartStyle;
use crate::text::TextRenderer;

pub const X_AXIS_LABEL: &str = "Rotary Speed (RPM)";
pub const Y_AXIS_LABEL: &str = "Rate of Penetration (ft/hr)";

/// Tick count the step search aims for.
const TARGET_TICKS: usize = 7;
/// Tick mark length in pixels.
pub const TICK_LENGTH: f32 = 5.0;

/// Pixel rectangle the data ranges are mapped onto.
///
/// `left..right` and `top..bottom` are whole-pixel bounds; pixel columns
/// `left..right` and rows `top..bottom` belong to the plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub rpm: AxisRange,
    pub rop: AxisRange,
}

impl PlotArea {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    /// Canvas x for an RPM value.
    pub fn x_of(&self, rpm: f64) -> f32 {
        self.left as f32 + (self.rpm.normalize(rpm) * self.width() as f64) as f32
    }

    /// Canvas y for a ROP value (ROP grows upward).
    pub fn y_of(&self, rop: f64) -> f32 {
        self.bottom as f32 - (self.rop.normalize(rop) * self.height() as f64) as f32
    }

    pub fn project(&self, point: DataPoint) -> (f32, f32) {
        (self.x_of(point.rpm), self.y_of(point.rop))
    }

    /// RPM at the centre of pixel column `x`.
    pub fn rpm_at_pixel(&self, x: u32) -> f64 {
        let t = (x as f64 + 0.5 - self.left as f64) / self.width() as f64;
        self.rpm.fraction(t)
    }

    /// ROP at the centre of pixel row `y`.
    pub fn rop_at_pixel(&self, y: u32) -> f64 {
        let t = (self.bottom as f64 - y as f64 - 0.5) / self.height() as f64;
        self.rop.fraction(t)
    }
}

/// Tick positions for one axis plus the decimals their labels need.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticks {
    pub values: Vec<f64>,
    pub decimals: usize,
}

impl Ticks {
    /// Ticks on a "nice" step (1, 2, 2.5, 5 × 10^k) covering `range`.
    pub fn for_range(range: &AxisRange) -> Self {
        let step = nice_step(range.span(), TARGET_TICKS);
        let values = generate_contour_levels(range.min, range.max, step)
            .into_iter()
            .map(|v| if v == 0.0 { 0.0 } else { v }) // no "-0"
            .collect();
        Self {
            values,
            decimals: decimals_for(step),
        }
    }

    pub fn label(&self, value: f64) -> String {
        format!("{:.*}", self.decimals, value)
    }

    pub fn labels(&self) -> impl Iterator<Item = (f64, String)> + '_ {
        self.values.iter().map(|&v| (v, self.label(v)))
    }
}

/// Largest of 1, 2, 2.5, 5 × 10^k not giving fewer than about `target` ticks.
pub fn nice_step(span: f64, target: usize) -> f64 {
    let raw = span / target.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;

    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 2.5 {
        2.5
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Fewest decimals that print every multiple of `step` exactly.
fn decimals_for(step: f64) -> usize {
    (0..=6)
        .find(|&d| {
            let scaled = step * 10f64.powi(d as i32);
            (scaled - scaled.round()).abs() < 1e-6 * scaled.abs().max(1.0)
        })
        .unwrap_or(6)
}

/// Canvas margins and resolved plot rectangle for one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub plot: PlotArea,
    pub x_ticks: Ticks,
    pub y_ticks: Ticks,
    /// Pixel sizes resolved from point sizes.
    pub title_px: f32,
    pub label_px: f32,
    pub tick_px: f32,
    pub annotation_px: f32,
}

impl Layout {
    /// Reserve room around the plot for the title, axis labels, tick labels,
    /// and the threshold label when the boundary leaves through the right edge.
    pub fn compute(
        style: &ChartStyle,
        text: &TextRenderer,
        rpm: AxisRange,
        rop: AxisRange,
        font_size: f32,
        boundary: &BoundarySegment,
        threshold_label: &str,
    ) -> Self {
        let title_px = style.pt_to_px(font_size + 2.0);
        let label_px = style.pt_to_px(font_size);
        let tick_px = style.pt_to_px(style.tick_font_size);
        let annotation_px = style.pt_to_px(font_size);
        let pad = style.padding;

        let x_ticks = Ticks::for_range(&rpm);
        let y_ticks = Ticks::for_range(&rop);

        let widest_y_tick = y_ticks
            .labels()
            .map(|(_, l)| text.line_width(&l, tick_px))
            .fold(0.0, f32::max);

        let left = pad + text.line_height(label_px) + pad + widest_y_tick + TICK_LENGTH + pad / 2.0;
        let bottom_margin = pad + text.line_height(label_px) + pad / 2.0 + text.line_height(tick_px) + TICK_LENGTH;
        let top = pad + text.line_height(title_px) + pad;

        // Half the last x tick label may overhang the plot's right edge
        let tick_overhang = x_ticks
            .labels()
            .last()
            .map(|(_, l)| text.line_width(&l, tick_px) / 2.0)
            .unwrap_or(0.0);
        let exits_right = boundary.exit.rpm >= rpm.max;
        let threshold_room = if exits_right {
            style.pt_to_px(5.0) + text.line_width(threshold_label, tick_px) + 2.0 * threshold_box_pad(tick_px)
        } else {
            0.0
        };
        let right_margin = pad + tick_overhang.max(threshold_room);

        let width = style.width as f32;
        let height = style.height as f32;
        // Never let margins squeeze the plot below a quarter of the canvas
        let left = left.min(width * 0.375).round() as u32;
        let right = (width - right_margin.min(width * 0.375)).round() as u32;
        let top = top.min(height * 0.375).round() as u32;
        let bottom = (height - bottom_margin.min(height * 0.375)).round() as u32;

        Self {
            plot: PlotArea {
                left,
                top,
                right,
                bottom,
                rpm,
                rop,
            },
            x_ticks,
            y_ticks,
            title_px,
            label_px,
            tick_px,
            annotation_px,
        }
    }
}

/// Padding inside the threshold label box.
pub fn threshold_box_pad(tick_px: f32) -> f32 {
    tick_px * 0.3
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_common::{Axis, BoundaryRay, Threshold};

    fn range(min: f64, max: f64) -> AxisRange {
        AxisRange::new(Axis::Rpm, min, max).unwrap()
    }

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(300.0, 7), 50.0);
        assert_eq!(nice_step(1.0, 7), 0.2);
        assert_eq!(nice_step(140.0, 7), 20.0);
        assert_eq!(nice_step(100.0, 7), 20.0);
    }

    #[test]
    fn test_ticks_cover_range() {
        let ticks = Ticks::for_range(&range(0.0, 300.0));
        assert_eq!(ticks.values, vec![0.0, 50.0, 100.0, 150.0, 200.0, 250.0, 300.0]);
        assert_eq!(ticks.decimals, 0);
        assert_eq!(ticks.label(150.0), "150");
    }

    #[test]
    fn test_fractional_ticks() {
        let ticks = Ticks::for_range(&range(0.0, 1.0));
        assert_eq!(ticks.decimals, 1);
        assert_eq!(ticks.label(ticks.values[1]), "0.2");
    }

    #[test]
    fn test_plot_area_mapping() {
        let plot = PlotArea {
            left: 100,
            top: 50,
            right: 1100,
            bottom: 750,
            rpm: range(0.0, 300.0),
            rop: range(0.0, 300.0),
        };
        assert_eq!(plot.x_of(0.0), 100.0);
        assert_eq!(plot.x_of(300.0), 1100.0);
        assert_eq!(plot.y_of(0.0), 750.0);
        assert_eq!(plot.y_of(300.0), 50.0);
        assert!((plot.rpm_at_pixel(100) - 0.15).abs() < 1e-9);
        assert!((plot.rop_at_pixel(749) - 300.0 / 700.0 * 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_layout_reserves_threshold_room() {
        let style = ChartStyle::default();
        let text = TextRenderer::without_font();
        let rpm = range(0.0, 300.0);
        let rop = range(0.0, 300.0);

        let shallow = BoundaryRay::from_threshold(Threshold::new(0.15).unwrap())
            .clip(&rpm, &rop)
            .unwrap();
        let steep = BoundaryRay::from_threshold(Threshold::new(1.0).unwrap())
            .clip(&rpm, &rop)
            .unwrap();

        let right_exit = Layout::compute(&style, &text, rpm, rop, 20.0, &shallow, "0.15 in/rev");
        let top_exit = Layout::compute(&style, &text, rpm, rop, 20.0, &steep, "1.0 in/rev");

        assert!(right_exit.plot.right < top_exit.plot.right);
        assert!(right_exit.plot.left > 0 && right_exit.plot.right < style.width);
        assert!(right_exit.plot.top > 0 && right_exit.plot.bottom < style.height);
    }
}
