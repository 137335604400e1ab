//! Validated render inputs for one chart.

use serde::Serialize;

use crate::error::{Axis, DocError, DocResult};
use crate::grid::{DEFAULT_SAMPLE_COUNT, MAX_SAMPLE_COUNT};
use crate::range::AxisRange;
use crate::threshold::Threshold;

/// Default annotation font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 20.0;

/// Largest accepted annotation size in points.
pub const MAX_FONT_SIZE: f32 = 200.0;

/// Annotation for the region above the boundary when the caller supplies none.
pub const DEFAULT_TEXT_ABOVE_LINE: &str = "DOC feature engaged\n\
Adjust RPM, WOB, & Flow to Minimize:\n\
-MSE (Whirl, balling, dysfunction) and\n\
-Torque Variation (Stick-slip)";

/// Annotation for the region below the boundary when the caller supplies none.
pub const DEFAULT_TEXT_BELOW_LINE: &str = "DOC feature not engaged\nIncrease WOB";

/// Everything needed to render one DOC chart.
///
/// Immutable once built; lives for a single render call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub rpm: AxisRange,
    pub rop: AxisRange,
    pub threshold: Threshold,
    /// Text placed above the boundary (high DOC side).
    pub text_above_line: String,
    /// Text placed below the boundary (low DOC side).
    pub text_below_line: String,
    /// Annotation font size in points; the title uses `font_size + 2`.
    pub font_size: f32,
    /// Samples per grid axis.
    pub sample_count: usize,
}

impl ChartSpec {
    /// Validate raw parameters in the order rpm range, rop range, threshold.
    ///
    /// Uses the default annotation texts, font size, and sample count.
    pub fn new(
        rop_min: f64,
        rop_max: f64,
        rpm_min: f64,
        rpm_max: f64,
        doc_value: f64,
    ) -> DocResult<Self> {
        ChartSpecBuilder::new(rop_min, rop_max, rpm_min, rpm_max, doc_value).build()
    }

    pub fn builder(
        rop_min: f64,
        rop_max: f64,
        rpm_min: f64,
        rpm_max: f64,
        doc_value: f64,
    ) -> ChartSpecBuilder {
        ChartSpecBuilder::new(rop_min, rop_max, rpm_min, rpm_max, doc_value)
    }

    /// `DOC Chart (DOC = 0.15 in/rev)`
    pub fn title(&self) -> String {
        format!("DOC Chart (DOC = {} in/rev)", self.threshold)
    }

    /// `0.15 in/rev`
    pub fn threshold_label(&self) -> String {
        format!("{} in/rev", self.threshold)
    }
}

/// Collects optional parameters before validation.
#[derive(Debug, Clone)]
pub struct ChartSpecBuilder {
    rop_min: f64,
    rop_max: f64,
    rpm_min: f64,
    rpm_max: f64,
    doc_value: f64,
    text_above_line: String,
    text_below_line: String,
    font_size: f32,
    sample_count: usize,
}

impl ChartSpecBuilder {
    fn new(rop_min: f64, rop_max: f64, rpm_min: f64, rpm_max: f64, doc_value: f64) -> Self {
        Self {
            rop_min,
            rop_max,
            rpm_min,
            rpm_max,
            doc_value,
            text_above_line: DEFAULT_TEXT_ABOVE_LINE.to_string(),
            text_below_line: DEFAULT_TEXT_BELOW_LINE.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            sample_count: DEFAULT_SAMPLE_COUNT,
        }
    }

    pub fn text_above_line(mut self, text: impl Into<String>) -> Self {
        self.text_above_line = text.into();
        self
    }

    pub fn text_below_line(mut self, text: impl Into<String>) -> Self {
        self.text_below_line = text.into();
        self
    }

    pub fn font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    /// Validate and freeze. Fails on the first invalid parameter.
    pub fn build(self) -> DocResult<ChartSpec> {
        let rpm = AxisRange::new(Axis::Rpm, self.rpm_min, self.rpm_max)?;
        let rop = AxisRange::new(Axis::Rop, self.rop_min, self.rop_max)?;
        let threshold = Threshold::new(self.doc_value)?;

        if !self.font_size.is_finite() || self.font_size <= 0.0 || self.font_size > MAX_FONT_SIZE {
            return Err(DocError::invalid_parameter(
                "font_size",
                format!("must be in (0, {}], got {}", MAX_FONT_SIZE, self.font_size),
            ));
        }
        if !(2..=MAX_SAMPLE_COUNT).contains(&self.sample_count) {
            return Err(DocError::invalid_parameter(
                "sample_count",
                format!(
                    "need between 2 and {} samples per axis, got {}",
                    MAX_SAMPLE_COUNT, self.sample_count
                ),
            ));
        }

        Ok(ChartSpec {
            rpm,
            rop,
            threshold,
            text_above_line: self.text_above_line,
            text_below_line: self.text_below_line,
            font_size: self.font_size,
            sample_count: self.sample_count,
        })
    }
}
