//! Per-render drawing surface.
//!
//! A `ChartCanvas` is created for one chart, drawn into, converted to an
//! image for text, and dropped. Nothing is shared between renders.

use image::RgbaImage;
use rayon::prelude::*;
use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, StrokeDash,
    Transform,
};

use doc_common::{Classification, ClassifiedField, DocError, DocResult, SampleGrid};

use crate::layout::PlotArea;
use crate::style::Rgb;

/// Stroke settings for lines and box edges.
#[derive(Debug, Clone, Copy)]
pub struct LineStyle<'a> {
    pub color: Rgb,
    pub alpha: f32,
    pub width: f32,
    pub dash: Option<&'a [f32]>,
}

impl<'a> LineStyle<'a> {
    pub fn solid(color: Rgb, width: f32) -> Self {
        Self {
            color,
            alpha: 1.0,
            width,
            dash: None,
        }
    }
}

pub struct ChartCanvas {
    pixmap: Pixmap,
}

impl ChartCanvas {
    pub fn new(width: u32, height: u32, background: Rgb) -> DocResult<Self> {
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            DocError::RenderingFailure(format!("cannot allocate {}x{} canvas", width, height))
        })?;
        pixmap.fill(Color::from_rgba8(background.r, background.g, background.b, 255));
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Colour every plot pixel by the class of its nearest grid cell.
    ///
    /// `above` is used for `NotEngaged` cells (DOC above the threshold, on the
    /// high-ROP side of the boundary), `below` for `Engaged` cells.
    pub fn fill_regions(
        &mut self,
        plot: &PlotArea,
        grid: &SampleGrid,
        classes: &ClassifiedField,
        above: Rgb,
        below: Rgb,
    ) {
        let canvas_width = self.pixmap.width() as usize;

        // Nearest grid column per pixel column and row per pixel row
        let cols: Vec<usize> = (plot.left..plot.right)
            .map(|x| grid.nearest_cell(plot.rpm_at_pixel(x), plot.rop.min).1)
            .collect();
        let rows: Vec<usize> = (plot.top..plot.bottom)
            .map(|y| grid.nearest_cell(plot.rpm.min, plot.rop_at_pixel(y)).0)
            .collect();

        let above = above.to_rgba(255);
        let below = below.to_rgba(255);
        let (left, top) = (plot.left as usize, plot.top as usize);

        self.pixmap
            .data_mut()
            .par_chunks_exact_mut(canvas_width * 4)
            .enumerate()
            .skip(top)
            .take(rows.len())
            .for_each(|(y, line)| {
                let row = rows[y - top];
                for (i, &col) in cols.iter().enumerate() {
                    let color = match classes.get(row, col) {
                        Classification::NotEngaged => &above,
                        Classification::Engaged => &below,
                    };
                    let offset = (left + i) * 4;
                    line[offset..offset + 4].copy_from_slice(color);
                }
            });
    }

    /// Stroke an open polyline through canvas points.
    pub fn stroke_polyline(&mut self, points: &[(f32, f32)], line: LineStyle<'_>) {
        if points.len() < 2 {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.move_to(points[0].0, points[0].1);
        for &(x, y) in &points[1..] {
            pb.line_to(x, y);
        }
        if let Some(path) = pb.finish() {
            self.stroke_path(&path, line);
        }
    }

    /// Fill and/or outline a rectangle, optionally with rounded corners.
    pub fn draw_box(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        fill: Option<(Rgb, f32)>,
        edge: Option<LineStyle<'_>>,
    ) {
        let Some(path) = box_path(x, y, width, height, radius) else {
            return;
        };
        if let Some((color, alpha)) = fill {
            let paint = paint(color, alpha);
            self.pixmap
                .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
        if let Some(edge) = edge {
            self.stroke_path(&path, edge);
        }
    }

    fn stroke_path(&mut self, path: &Path, line: LineStyle<'_>) {
        let paint = paint(line.color, line.alpha);
        let mut stroke = Stroke::default();
        stroke.width = line.width;
        stroke.line_cap = LineCap::Butt;
        stroke.line_join = LineJoin::Round;
        stroke.dash = line.dash.and_then(|d| StrokeDash::new(d.to_vec(), 0.0));
        self.pixmap
            .stroke_path(path, &paint, &stroke, Transform::identity(), None);
    }

    /// Hand the pixels over for text drawing.
    ///
    /// Every pixel is opaque, so tiny-skia's premultiplied storage already
    /// equals straight RGBA.
    pub fn into_image(self) -> DocResult<RgbaImage> {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        RgbaImage::from_raw(width, height, self.pixmap.take()).ok_or_else(|| {
            DocError::RenderingFailure("canvas buffer size mismatch".to_string())
        })
    }
}

fn paint(color: Rgb, alpha: f32) -> Paint<'static> {
    let mut paint = Paint::default();
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    paint.set_color_rgba8(color.r, color.g, color.b, a);
    paint.anti_alias = true;
    paint
}

fn box_path(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Option<Path> {
    let radius = radius.min(width / 2.0).min(height / 2.0).max(0.0);
    if radius == 0.0 {
        return Some(PathBuilder::from_rect(Rect::from_xywh(x, y, width, height)?));
    }

    let (r, b) = (x + width, y + height);
    let mut pb = PathBuilder::new();
    pb.move_to(x + radius, y);
    pb.line_to(r - radius, y);
    pb.quad_to(r, y, r, y + radius);
    pb.line_to(r, b - radius);
    pb.quad_to(r, b, r - radius, b);
    pb.line_to(x + radius, b);
    pb.quad_to(x, b, x, b - radius);
    pb.line_to(x, y + radius);
    pb.quad_to(x, y, x + radius, y);
    pb.close();
    pb.finish()
}
