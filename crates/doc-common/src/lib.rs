//! Grid & classification engine for DOC (depth of cut) charts.
//!
//! Builds an RPM × ROP sample grid, evaluates
//! `DOC = (ROP * 12) / (RPM * 60)` over it, classifies each cell against a
//! threshold, and computes the straight boundary ray `ROP = 5 * T * RPM`.

pub mod boundary;
pub mod chart;
pub mod engine;
pub mod error;
pub mod grid;
pub mod range;
pub mod threshold;

pub use boundary::{BoundaryRay, BoundarySegment, DataPoint};
pub use chart::{
    ChartSpec, ChartSpecBuilder, DEFAULT_FONT_SIZE, DEFAULT_TEXT_ABOVE_LINE, DEFAULT_TEXT_BELOW_LINE,
    MAX_FONT_SIZE,
};
pub use engine::{evaluate, Evaluation};
pub use error::{Axis, DocError, DocResult};
pub use grid::{ClassifiedField, DocField, SampleGrid, DEFAULT_SAMPLE_COUNT, MAX_SAMPLE_COUNT};
pub use range::AxisRange;
pub use threshold::{classify, doc, Classification, Threshold};
