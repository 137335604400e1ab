//! Sample grid over (RPM, ROP) and the DOC field evaluated on it.
//!
//! All 2-D data is stored row-major with rows running along ROP and columns
//! along RPM, matching a `meshgrid(rpm, rop)` construction:
//! `rpm(row, col) = rpm_samples[col]`, `rop(row, col) = rop_samples[row]`.

use crate::error::{DocError, DocResult};
use crate::range::AxisRange;
use crate::threshold::{classify, doc, Classification, Threshold};

/// Default number of samples per axis.
pub const DEFAULT_SAMPLE_COUNT: usize = 1000;

/// Upper bound on samples per axis; the grid holds the square of this.
pub const MAX_SAMPLE_COUNT: usize = 4000;

/// N×N outer-product grid of linearly spaced RPM and ROP samples.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    rpm: Vec<f64>,
    rop: Vec<f64>,
}

impl SampleGrid {
    /// Build an `n`×`n` grid spanning both ranges, endpoints included.
    pub fn new(rpm: &AxisRange, rop: &AxisRange, n: usize) -> DocResult<Self> {
        if n < 2 {
            return Err(DocError::invalid_parameter(
                "sample_count",
                format!("need at least 2 samples per axis, got {}", n),
            ));
        }
        Ok(Self {
            rpm: rpm.linspace(n),
            rop: rop.linspace(n),
        })
    }

    /// Samples per axis.
    pub fn n(&self) -> usize {
        self.rpm.len()
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rop.len(), self.rpm.len())
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rop.len() * self.rpm.len()
    }

    /// RPM samples along the column axis.
    pub fn rpm_samples(&self) -> &[f64] {
        &self.rpm
    }

    /// ROP samples along the row axis.
    pub fn rop_samples(&self) -> &[f64] {
        &self.rop
    }

    pub fn rpm_at(&self, _row: usize, col: usize) -> f64 {
        self.rpm[col]
    }

    pub fn rop_at(&self, row: usize, _col: usize) -> f64 {
        self.rop[row]
    }

    /// Materialised RPM array (row-major).
    pub fn rpm_mesh(&self) -> Vec<f64> {
        self.rop
            .iter()
            .flat_map(|_| self.rpm.iter().copied())
            .collect()
    }

    /// Materialised ROP array (row-major).
    pub fn rop_mesh(&self) -> Vec<f64> {
        self.rop
            .iter()
            .flat_map(|&p| std::iter::repeat(p).take(self.rpm.len()))
            .collect()
    }

    /// Index of the sample nearest to `value` on a sorted axis.
    fn nearest(samples: &[f64], value: f64) -> usize {
        match samples.binary_search_by(|s| s.total_cmp(&value)) {
            Ok(idx) => idx,
            Err(0) => 0,
            Err(idx) if idx >= samples.len() => samples.len() - 1,
            Err(idx) => {
                if (value - samples[idx - 1]) <= (samples[idx] - value) {
                    idx - 1
                } else {
                    idx
                }
            }
        }
    }

    /// Nearest grid cell (row, col) to a data-space point, clamped to the grid.
    pub fn nearest_cell(&self, rpm: f64, rop: f64) -> (usize, usize) {
        (Self::nearest(&self.rop, rop), Self::nearest(&self.rpm, rpm))
    }
}

/// DOC value (in/rev) at every grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct DocField {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl DocField {
    /// Evaluate the DOC formula at every cell of `grid`.
    ///
    /// Zero-RPM cells hold `f64::INFINITY`.
    pub fn evaluate(grid: &SampleGrid) -> Self {
        let (rows, cols) = grid.shape();
        let mut values = Vec::with_capacity(rows * cols);
        for &p in grid.rop_samples() {
            values.extend(grid.rpm_samples().iter().map(|&r| doc(r, p)));
        }
        Self { rows, cols, values }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    /// Row-major values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Largest finite DOC value, if any cell is finite.
    pub fn finite_max(&self) -> Option<f64> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }

    /// Smallest finite DOC value, if any cell is finite.
    pub fn finite_min(&self) -> Option<f64> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .reduce(f64::min)
    }

    /// Bin every cell against the threshold.
    pub fn classify(&self, threshold: Threshold) -> ClassifiedField {
        ClassifiedField {
            rows: self.rows,
            cols: self.cols,
            cells: self.values.iter().map(|&v| classify(v, threshold)).collect(),
        }
    }
}

/// Per-cell classification, same shape as the field it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedField {
    rows: usize,
    cols: usize,
    cells: Vec<Classification>,
}

impl ClassifiedField {
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Classification {
        self.cells[row * self.cols + col]
    }

    pub fn cells(&self) -> &[Classification] {
        &self.cells
    }

    pub fn engaged_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| **c == Classification::Engaged)
            .count()
    }

    pub fn not_engaged_count(&self) -> usize {
        self.cells.len() - self.engaged_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Axis;

    fn grid(n: usize) -> SampleGrid {
        let rpm = AxisRange::new(Axis::Rpm, 0.0, 300.0).unwrap();
        let rop = AxisRange::new(Axis::Rop, 0.0, 300.0).unwrap();
        SampleGrid::new(&rpm, &rop, n).unwrap()
    }

    #[test]
    fn test_grid_shape() {
        let g = grid(7);
        assert_eq!(g.shape(), (7, 7));
        assert_eq!(g.cell_count(), 49);
        assert_eq!(g.rpm_mesh().len(), 49);
        assert_eq!(g.rop_mesh().len(), 49);
    }

    #[test]
    fn test_grid_rejects_single_sample() {
        let rpm = AxisRange::new(Axis::Rpm, 0.0, 1.0).unwrap();
        let err = SampleGrid::new(&rpm, &rpm, 1).unwrap_err();
        assert!(matches!(err, DocError::InvalidParameter { .. }));
    }

    #[test]
    fn test_meshgrid_orientation() {
        let g = grid(4);
        let rpm = g.rpm_mesh();
        let rop = g.rop_mesh();
        // second row, third column
        assert_eq!(rpm[4 + 2], 200.0);
        assert_eq!(rop[4 + 2], 100.0);
        assert_eq!(g.rpm_at(1, 2), 200.0);
        assert_eq!(g.rop_at(1, 2), 100.0);
    }

    #[test]
    fn test_nearest_cell() {
        let g = grid(4); // samples 0, 100, 200, 300
        assert_eq!(g.nearest_cell(0.0, 0.0), (0, 0));
        assert_eq!(g.nearest_cell(149.0, 260.0), (3, 1));
        assert_eq!(g.nearest_cell(-50.0, 500.0), (3, 0));
    }

    #[test]
    fn test_field_zero_rpm_column() {
        let g = grid(5);
        let field = DocField::evaluate(&g);
        for row in 0..5 {
            assert_eq!(field.get(row, 0), f64::INFINITY);
        }
        let classes = field.classify(Threshold::new(0.15).unwrap());
        for row in 0..5 {
            assert_eq!(classes.get(row, 0), Classification::NotEngaged);
        }
    }

    #[test]
    fn test_finite_extremes() {
        let field = DocField::evaluate(&grid(4));
        // max at lowest non-zero rpm (100) and highest rop (300)
        assert_eq!(field.finite_max(), Some((300.0 * 12.0) / (100.0 * 60.0)));
        assert_eq!(field.finite_min(), Some(0.0));
    }
}
