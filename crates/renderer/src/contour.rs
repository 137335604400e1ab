//! Iso-DOC line tracing using the marching squares algorithm.
//!
//! Segments are produced in fractional grid-index space and joined into
//! polylines, then mapped back to (RPM, ROP) data space so the canvas can
//! project them like any other data geometry.

use std::collections::{HashMap, VecDeque};

use doc_common::{DataPoint, DocField, SampleGrid};

/// A point in fractional grid-index space (`x` = column, `y` = row)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn key(&self) -> (u64, u64) {
        (self.x.to_bits(), self.y.to_bits())
    }
}

/// A line segment between two points
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// A joined contour line in grid-index space
#[derive(Debug, Clone)]
pub struct Contour {
    pub level: f64,
    pub points: Vec<Point>,
    pub closed: bool,
}

/// A traced iso-line in (RPM, ROP) data space
#[derive(Debug, Clone, PartialEq)]
pub struct IsoLine {
    pub level: f64,
    pub points: Vec<DataPoint>,
}

impl IsoLine {
    /// Point halfway along the polyline by vertex count.
    pub fn middle(&self) -> Option<DataPoint> {
        self.points.get(self.points.len() / 2).copied()
    }
}

/// Generate contour levels automatically based on data range and interval.
///
/// Levels are computed by index rather than accumulated so repeated
/// additions don't drift off the interval multiples.
pub fn generate_contour_levels(min_value: f64, max_value: f64, interval: f64) -> Vec<f64> {
    if !(interval > 0.0) || !(max_value > min_value) || !min_value.is_finite() || !max_value.is_finite() {
        return vec![];
    }

    // Absorb quotient rounding, e.g. 1.0 / 0.05 = 19.999...
    let eps = 1e-9;
    let first = (min_value / interval - eps).ceil() as i64;
    let last = (max_value / interval + eps).floor() as i64;
    let slack = interval * eps;

    (first..=last)
        .map(|i| i as f64 * interval)
        .filter(|level| *level >= min_value - slack && *level <= max_value + slack)
        .collect()
}

/// Marching squares algorithm to generate contour segments
///
/// # Arguments
/// * `data` - Grid data in row-major order
/// * `width` - Grid width (columns)
/// * `height` - Grid height (rows)
/// * `level` - Contour level to extract
///
/// Cells with a NaN corner are skipped. `+inf` corners count as above the
/// level.
pub fn march_squares(data: &[f64], width: usize, height: usize, level: f64) -> Vec<Segment> {
    if width < 2 || height < 2 || data.len() != width * height {
        return vec![];
    }

    let mut segments = Vec::new();

    for y in 0..(height - 1) {
        for x in 0..(width - 1) {
            let tl = data[y * width + x];
            let tr = data[y * width + x + 1];
            let bl = data[(y + 1) * width + x];
            let br = data[(y + 1) * width + x + 1];

            if tl.is_nan() || tr.is_nan() || bl.is_nan() || br.is_nan() {
                continue;
            }

            // Cell index (0-15) from which corners are at or above the level
            let mut cell_index = 0u8;
            if tl >= level {
                cell_index |= 1;
            }
            if tr >= level {
                cell_index |= 2;
            }
            if br >= level {
                cell_index |= 4;
            }
            if bl >= level {
                cell_index |= 8;
            }

            if cell_index == 0 || cell_index == 15 {
                continue;
            }

            push_cell_segments(
                &mut segments,
                cell_index,
                x as f64,
                y as f64,
                [tl, tr, br, bl],
                level,
            );
        }
    }

    segments
}

/// Append the segments for one marching squares cell.
fn push_cell_segments(
    out: &mut Vec<Segment>,
    cell_index: u8,
    x: f64,
    y: f64,
    [tl, tr, br, bl]: [f64; 4],
    level: f64,
) {
    // Edge argument order must match between neighbouring cells so shared
    // crossing points come out bit-identical for `connect_segments`.
    let top = || interpolate_edge(x, y, x + 1.0, y, tl, tr, level);
    let right = || interpolate_edge(x + 1.0, y, x + 1.0, y + 1.0, tr, br, level);
    let bottom = || interpolate_edge(x, y + 1.0, x + 1.0, y + 1.0, bl, br, level);
    let left = || interpolate_edge(x, y, x, y + 1.0, tl, bl, level);

    let mut push = |start: Point, end: Point| out.push(Segment { start, end });

    match cell_index {
        1 | 14 => push(left(), top()),
        2 | 13 => push(top(), right()),
        3 | 12 => push(left(), right()),
        4 | 11 => push(right(), bottom()),
        5 => {
            // Saddle case - two separate segments
            push(left(), top());
            push(right(), bottom());
        }
        6 | 9 => push(top(), bottom()),
        7 | 8 => push(left(), bottom()),
        10 => {
            // Saddle case - two separate segments
            push(top(), right());
            push(left(), bottom());
        }
        _ => {}
    }
}

/// Find where `level` crosses the edge between two corner values.
///
/// With an infinite endpoint the crossing is interpolated on reciprocals,
/// which is exact for DOC along a row since `1/doc` is linear in RPM there.
fn interpolate_edge(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    val1: f64,
    val2: f64,
    level: f64,
) -> Point {
    let t = if val1.is_infinite() || val2.is_infinite() {
        let (inv1, inv2) = (1.0 / val1, 1.0 / val2);
        if (inv2 - inv1).abs() < f64::EPSILON {
            0.5
        } else {
            (1.0 / level - inv1) / (inv2 - inv1)
        }
    } else if (val2 - val1).abs() < 1e-12 {
        0.5
    } else {
        (level - val1) / (val2 - val1)
    };
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };

    Point::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1))
}

/// Connect line segments into continuous polylines
///
/// Neighbouring cells emit bit-identical shared endpoints, so segments are
/// joined through an exact endpoint index instead of a distance search.
pub fn connect_segments(segments: Vec<Segment>, level: f64) -> Vec<Contour> {
    if segments.is_empty() {
        return vec![];
    }

    let mut by_endpoint: HashMap<(u64, u64), Vec<usize>> = HashMap::with_capacity(segments.len() * 2);
    for (i, seg) in segments.iter().enumerate() {
        by_endpoint.entry(seg.start.key()).or_default().push(i);
        by_endpoint.entry(seg.end.key()).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut contours = Vec::new();

    // Follow unused segments touching `from`, returning the far endpoint
    let next_from = |from: Point, used: &mut Vec<bool>| -> Option<Point> {
        let candidates = by_endpoint.get(&from.key())?;
        for &i in candidates {
            if used[i] {
                continue;
            }
            used[i] = true;
            let seg = segments[i];
            return Some(if seg.start.key() == from.key() {
                seg.end
            } else {
                seg.start
            });
        }
        None
    };

    for start_idx in 0..segments.len() {
        if used[start_idx] {
            continue;
        }
        used[start_idx] = true;

        let seed = segments[start_idx];
        let mut points: VecDeque<Point> = VecDeque::from([seed.start, seed.end]);

        let mut tail = seed.end;
        while let Some(next) = next_from(tail, &mut used) {
            points.push_back(next);
            tail = next;
        }

        let mut head = seed.start;
        while let Some(prev) = next_from(head, &mut used) {
            points.push_front(prev);
            head = prev;
        }

        let closed = points.len() > 2 && points.front().map(Point::key) == points.back().map(Point::key);

        contours.push(Contour {
            level,
            points: points.into_iter().collect(),
            closed,
        });
    }

    contours
}

/// Map a fractional sample index onto an axis' sample values.
fn index_to_value(samples: &[f64], idx: f64) -> f64 {
    let last = samples.len() - 1;
    let lo = (idx.floor() as usize).min(last);
    let hi = (lo + 1).min(last);
    let frac = idx - lo as f64;
    samples[lo] + frac * (samples[hi] - samples[lo])
}

/// Trace one DOC level over the field and return it in data space.
pub fn trace_level(grid: &SampleGrid, field: &DocField, level: f64) -> Vec<IsoLine> {
    let (rows, cols) = field.shape();
    let segments = march_squares(field.values(), cols, rows, level);
    let contours = connect_segments(segments, level);

    contours
        .into_iter()
        .filter(|c| c.points.len() >= 2)
        .map(|c| IsoLine {
            level: c.level,
            points: c
                .points
                .iter()
                .map(|p| {
                    DataPoint::new(
                        index_to_value(grid.rpm_samples(), p.x),
                        index_to_value(grid.rop_samples(), p.y),
                    )
                })
                .collect(),
        })
        .collect()
}

/// Trace several levels.
pub fn trace_levels(grid: &SampleGrid, field: &DocField, levels: &[f64]) -> Vec<IsoLine> {
    let lines: Vec<IsoLine> = levels
        .iter()
        .flat_map(|&level| trace_level(grid, field, level))
        .collect();

    tracing::debug!(
        num_levels = levels.len(),
        num_lines = lines.len(),
        total_points = lines.iter().map(|l| l.points.len()).sum::<usize>(),
        "Traced iso-DOC lines"
    );

    lines
}
