//! DOC chart composition: regions, boundary, annotations, axes, PNG.

use std::time::Instant;

use image::{Rgba, RgbaImage};

use doc_common::{evaluate, BoundarySegment, ChartSpec, DataPoint, DocResult, Evaluation};

use crate::canvas::{ChartCanvas, LineStyle};
use crate::contour::{generate_contour_levels, trace_levels, IsoLine};
use crate::layout::{threshold_box_pad, Layout, PlotArea, TICK_LENGTH, X_AXIS_LABEL, Y_AXIS_LABEL};
use crate::png;
use crate::style::{ChartStyle, Rgb};
use crate::text::TextRenderer;

/// Fractional plot positions (from the axis minimums) of the two annotations.
pub const ABOVE_LINE_ANCHOR: (f64, f64) = (0.3, 0.8);
pub const BELOW_LINE_ANCHOR: (f64, f64) = (0.7, 0.2);

/// Cap on iso-DOC guide lines; small intervals over steep fields otherwise
/// produce hundreds of levels.
const MAX_GUIDE_LEVELS: usize = 24;

const GRID_DASH: [f32; 2] = [6.0, 4.0];
const THRESHOLD_BOX_EDGE: Rgb = Rgb::new(0x80, 0x80, 0x80);

/// An encoded chart plus the geometry it was drawn with.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub boundary: BoundarySegment,
    pub plot: PlotArea,
}

/// Renders charts with a fixed style and a font loaded once up front.
///
/// Holds no per-chart state; one renderer can serve any number of
/// concurrent `render` calls.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    style: ChartStyle,
    text: TextRenderer,
}

impl ChartRenderer {
    pub fn new(style: ChartStyle) -> DocResult<Self> {
        let text = TextRenderer::load(style.font_path.as_deref());
        Self::with_text(style, text)
    }

    pub fn with_text(style: ChartStyle, text: TextRenderer) -> DocResult<Self> {
        style.validate()?;
        Ok(Self { style, text })
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn has_font(&self) -> bool {
        self.text.has_font()
    }

    /// Render one chart to PNG.
    pub fn render(&self, spec: &ChartSpec) -> DocResult<RenderedChart> {
        let start = Instant::now();
        let style = &self.style;

        let eval = evaluate(spec)?;
        let threshold_label = spec.threshold_label();
        let layout = Layout::compute(
            style,
            &self.text,
            spec.rpm,
            spec.rop,
            spec.font_size,
            &eval.boundary,
            &threshold_label,
        );
        let plot = layout.plot;

        let mut canvas = ChartCanvas::new(style.width, style.height, style.background)?;
        canvas.fill_regions(
            &plot,
            &eval.grid,
            &eval.classes,
            style.above_fill(),
            style.below_fill(),
        );
        self.draw_grid_lines(&mut canvas, &layout);

        let guides = self.trace_guides(spec, &eval);
        for line in &guides {
            let points: Vec<(f32, f32)> = line.points.iter().map(|&p| plot.project(p)).collect();
            canvas.stroke_polyline(
                &points,
                LineStyle {
                    color: style.guide_color,
                    alpha: 0.6,
                    width: 1.0,
                    dash: None,
                },
            );
        }

        canvas.stroke_polyline(
            &[plot.project(eval.boundary.entry), plot.project(eval.boundary.exit)],
            LineStyle::solid(style.boundary_color, style.boundary_width),
        );
        self.draw_frame(&mut canvas, &layout);

        let annotations = [
            Annotation::new(
                &spec.text_above_line,
                anchor(&plot, ABOVE_LINE_ANCHOR),
                style.above_color,
            ),
            Annotation::new(
                &spec.text_below_line,
                anchor(&plot, BELOW_LINE_ANCHOR),
                style.below_color,
            ),
        ];
        for annotation in &annotations {
            self.draw_annotation_box(&mut canvas, annotation, layout.annotation_px);
        }
        let threshold_box = self.threshold_box(&canvas, &plot, &eval.boundary, &threshold_label, layout.tick_px);
        canvas.draw_box(
            threshold_box.x,
            threshold_box.y,
            threshold_box.width,
            threshold_box.height,
            threshold_box.height * 0.25,
            Some((Rgb::WHITE, 1.0)),
            Some(LineStyle::solid(THRESHOLD_BOX_EDGE, 1.0)),
        );
        let guide_labels = self.guide_label_boxes(&mut canvas, &plot, &guides, layout.tick_px);

        let mut img = canvas.into_image()?;
        let ink = Rgba([0, 0, 0, 255]);

        self.draw_axis_text(&mut img, spec, &layout, ink);
        for annotation in &annotations {
            self.text
                .draw_centered(&mut img, annotation.text, annotation.cx, annotation.cy, layout.annotation_px, ink);
        }
        self.text.draw_line(
            &mut img,
            &threshold_label,
            threshold_box.x + threshold_box_pad(layout.tick_px),
            threshold_box.y + threshold_box_pad(layout.tick_px),
            layout.tick_px,
            ink,
        );
        for (label, x, y) in &guide_labels {
            self.text
                .draw_centered(&mut img, label, *x, *y, layout.tick_px * 0.8, to_rgba(style.guide_color));
        }

        let png = png::encode_image(&img)?;

        tracing::debug!(
            width = style.width,
            height = style.height,
            samples = eval.grid.n(),
            guide_lines = guides.len(),
            exit_rpm = eval.boundary.exit.rpm,
            exit_rop = eval.boundary.exit.rop,
            png_bytes = png.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Rendered DOC chart"
        );

        Ok(RenderedChart {
            png,
            width: style.width,
            height: style.height,
            boundary: eval.boundary,
            plot,
        })
    }

    /// Iso-DOC lines at multiples of the configured interval, threshold excluded.
    fn trace_guides(&self, spec: &ChartSpec, eval: &Evaluation) -> Vec<IsoLine> {
        let (Some(interval), Some(max)) = (self.style.guide_interval, eval.field.finite_max()) else {
            return Vec::new();
        };
        let t = spec.threshold.value();
        // Near-zero RPM pushes the field maximum toward infinity
        let ceiling = max.min(interval * (MAX_GUIDE_LEVELS + 1) as f64);
        let levels: Vec<f64> = generate_contour_levels(interval, ceiling, interval)
            .into_iter()
            .filter(|level| (level - t).abs() > interval * 1e-6)
            .take(MAX_GUIDE_LEVELS)
            .collect();
        trace_levels(&eval.grid, &eval.field, &levels)
    }

    fn draw_grid_lines(&self, canvas: &mut ChartCanvas, layout: &Layout) {
        let plot = &layout.plot;
        let line = LineStyle {
            color: self.style.grid_color,
            alpha: self.style.grid_alpha,
            width: 1.0,
            dash: Some(&GRID_DASH[..]),
        };
        for &v in &layout.x_ticks.values {
            let x = plot.x_of(v).round() + 0.5;
            canvas.stroke_polyline(&[(x, plot.top as f32), (x, plot.bottom as f32)], line);
        }
        for &v in &layout.y_ticks.values {
            let y = plot.y_of(v).round() - 0.5;
            canvas.stroke_polyline(&[(plot.left as f32, y), (plot.right as f32, y)], line);
        }
    }

    fn draw_frame(&self, canvas: &mut ChartCanvas, layout: &Layout) {
        let plot = &layout.plot;
        let black = LineStyle::solid(Rgb::BLACK, 1.0);
        canvas.draw_box(
            plot.left as f32 - 0.5,
            plot.top as f32 - 0.5,
            plot.width() as f32 + 1.0,
            plot.height() as f32 + 1.0,
            0.0,
            None,
            Some(black),
        );
        let bottom = plot.bottom as f32 + 0.5;
        for &v in &layout.x_ticks.values {
            let x = plot.x_of(v).round() + 0.5;
            canvas.stroke_polyline(&[(x, bottom), (x, bottom + TICK_LENGTH)], black);
        }
        let left = plot.left as f32 - 0.5;
        for &v in &layout.y_ticks.values {
            let y = plot.y_of(v).round() - 0.5;
            canvas.stroke_polyline(&[(left - TICK_LENGTH, y), (left, y)], black);
        }
    }

    fn draw_axis_text(&self, img: &mut RgbaImage, spec: &ChartSpec, layout: &Layout, ink: Rgba<u8>) {
        let plot = &layout.plot;
        let pad = self.style.padding;
        let centre_x = (plot.left + plot.right) as f32 / 2.0;
        let centre_y = (plot.top + plot.bottom) as f32 / 2.0;

        let title_h = self.text.line_height(layout.title_px);
        self.text
            .draw_centered(img, &spec.title(), centre_x, pad + title_h / 2.0, layout.title_px, ink);

        let tick_h = self.text.line_height(layout.tick_px);
        let tick_top = plot.bottom as f32 + TICK_LENGTH + 2.0;
        for (v, label) in layout.x_ticks.labels() {
            self.text
                .draw_centered(img, &label, plot.x_of(v), tick_top + tick_h / 2.0, layout.tick_px, ink);
        }
        for (v, label) in layout.y_ticks.labels() {
            let w = self.text.line_width(&label, layout.tick_px);
            let x = plot.left as f32 - TICK_LENGTH - pad / 2.0 - w;
            self.text
                .draw_line(img, &label, x, plot.y_of(v) - tick_h / 2.0, layout.tick_px, ink);
        }

        let label_h = self.text.line_height(layout.label_px);
        let x_label_y = tick_top + tick_h + pad / 2.0 + label_h / 2.0;
        self.text
            .draw_centered(img, X_AXIS_LABEL, centre_x, x_label_y, layout.label_px, ink);
        self.text.draw_vertical(
            img,
            Y_AXIS_LABEL,
            pad + label_h / 2.0,
            centre_y,
            layout.label_px,
            ink,
            to_rgba(self.style.background),
        );
    }

    fn draw_annotation_box(&self, canvas: &mut ChartCanvas, annotation: &Annotation<'_>, px: f32) {
        let (w, h) = self.text.measure(annotation.text, px);
        let pad = px * 0.3;
        canvas.draw_box(
            annotation.cx - w / 2.0 - pad,
            annotation.cy - h / 2.0 - pad,
            w + 2.0 * pad,
            h + 2.0 * pad,
            0.0,
            Some((annotation.color, self.style.region_alpha)),
            Some(LineStyle::solid(Rgb::BLACK, 1.0)),
        );
    }

    /// Label box left-aligned just right of the boundary exit, kept on canvas.
    fn threshold_box(
        &self,
        canvas: &ChartCanvas,
        plot: &PlotArea,
        boundary: &BoundarySegment,
        label: &str,
        tick_px: f32,
    ) -> BoxGeometry {
        let pad = threshold_box_pad(tick_px);
        let width = self.text.line_width(label, tick_px) + 2.0 * pad;
        let height = self.text.line_height(tick_px) + 2.0 * pad;
        let (ex, ey) = plot.project(boundary.exit);

        let x = (ex + self.style.pt_to_px(5.0)).min(canvas.width() as f32 - width - 1.0).max(0.0);
        let y = (ey - height / 2.0).clamp(0.0, (canvas.height() as f32 - height - 1.0).max(0.0));
        BoxGeometry { x, y, width, height }
    }

    /// White boxes behind guide labels; returns (text, centre x, centre y).
    fn guide_label_boxes(
        &self,
        canvas: &mut ChartCanvas,
        plot: &PlotArea,
        guides: &[IsoLine],
        tick_px: f32,
    ) -> Vec<(String, f32, f32)> {
        let px = tick_px * 0.8;
        let pad = px * 0.2;
        guides
            .iter()
            .filter_map(|line| {
                let mid = line.middle()?;
                let label = format_level(line.level);
                let (w, h) = self.text.measure(&label, px);
                let (x, y) = plot.project(mid);
                canvas.draw_box(
                    x - w / 2.0 - pad,
                    y - h / 2.0 - pad,
                    w + 2.0 * pad,
                    h + 2.0 * pad,
                    0.0,
                    Some((Rgb::WHITE, 0.85)),
                    None,
                );
                Some((label, x, y))
            })
            .collect()
    }
}

/// Render `spec` with a one-off renderer for `style`.
pub fn render_chart(spec: &ChartSpec, style: &ChartStyle) -> DocResult<RenderedChart> {
    ChartRenderer::new(style.clone())?.render(spec)
}

struct Annotation<'a> {
    text: &'a str,
    cx: f32,
    cy: f32,
    color: Rgb,
}

impl<'a> Annotation<'a> {
    fn new(text: &'a str, (cx, cy): (f32, f32), color: Rgb) -> Self {
        Self { text, cx, cy, color }
    }
}

#[derive(Debug, Clone, Copy)]
struct BoxGeometry {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

/// Canvas position of a fractional plot anchor.
fn anchor(plot: &PlotArea, (fx, fy): (f64, f64)) -> (f32, f32) {
    plot.project(DataPoint::new(plot.rpm.fraction(fx), plot.rop.fraction(fy)))
}

fn to_rgba(color: Rgb) -> Rgba<u8> {
    Rgba(color.to_rgba(255))
}

/// Guide labels: two decimals, trailing zeros kept (`0.05`, `0.10`).
fn format_level(level: f64) -> String {
    format!("{:.2}", level)
}
