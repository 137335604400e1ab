//! Chart rendering for DOC (depth of cut) diagrams.
//!
//! Turns a validated [`doc_common::ChartSpec`] into a PNG:
//! - Region fill from the classified DOC grid
//! - Boundary ray and optional iso-DOC guide lines (marching squares)
//! - Annotations, axes and title drawn with a runtime-loaded TrueType font
//! - Indexed or RGBA PNG encoding

pub mod canvas;
pub mod chart;
pub mod contour;
pub mod layout;
pub mod png;
pub mod style;
pub mod text;

pub use chart::{render_chart, ChartRenderer, RenderedChart};
pub use layout::PlotArea;
pub use style::{ChartStyle, Rgb};
pub use text::TextRenderer;
