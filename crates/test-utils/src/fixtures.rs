//! Common test fixtures for DOC chart tests.
//!
//! Raw parameters are kept as plain numbers so every crate in the workspace
//! can use them without depending on `doc-common`.

use serde_json::{json, Value};

/// Raw chart parameters in invocation order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    pub rop_min: f64,
    pub rop_max: f64,
    pub rpm_min: f64,
    pub rpm_max: f64,
    pub doc_value: f64,
    /// Where the boundary ray is expected to leave the plot, if it crosses it.
    pub expected_exit: Option<(f64, f64)>,
}

impl Scenario {
    /// Request body for the request/response invocation.
    pub fn request(&self) -> Value {
        json!({
            "rop_min": self.rop_min,
            "rop_max": self.rop_max,
            "rpm_min": self.rpm_min,
            "rpm_max": self.rpm_max,
            "doc_value": self.doc_value,
            "text_above_line": "DOC feature engaged",
            "text_below_line": "DOC feature not engaged\nIncrease WOB",
        })
    }
}

/// Canonical chart scenarios.
pub mod scenarios {
    use super::Scenario;

    /// The stock direct-call chart: ray exits through the right edge.
    pub const STANDARD: Scenario = Scenario {
        rop_min: 0.0,
        rop_max: 300.0,
        rpm_min: 0.0,
        rpm_max: 300.0,
        doc_value: 0.15,
        expected_exit: Some((300.0, 225.0)),
    };

    /// Steep ray: exits through the ROP ceiling.
    pub const STEEP: Scenario = Scenario {
        rop_min: 0.0,
        rop_max: 300.0,
        rpm_min: 0.0,
        rpm_max: 300.0,
        doc_value: 1.0,
        expected_exit: Some((60.0, 300.0)),
    };

    /// Offset window that does not include the origin.
    pub const OFFSET: Scenario = Scenario {
        rop_min: 50.0,
        rop_max: 250.0,
        rpm_min: 80.0,
        rpm_max: 220.0,
        doc_value: 0.2,
        expected_exit: Some((220.0, 220.0)),
    };

    /// Threshold so small the ray passes beneath the plotted rectangle.
    pub const MISSES_PLOT: Scenario = Scenario {
        rop_min: 200.0,
        rop_max: 300.0,
        rpm_min: 0.0,
        rpm_max: 100.0,
        doc_value: 0.01,
        expected_exit: None,
    };

    /// RPM range inverted.
    pub const INVERTED_RPM: Scenario = Scenario {
        rop_min: 0.0,
        rop_max: 300.0,
        rpm_min: 100.0,
        rpm_max: 50.0,
        doc_value: 0.15,
        expected_exit: None,
    };

    /// Zero threshold.
    pub const ZERO_THRESHOLD: Scenario = Scenario {
        rop_min: 0.0,
        rop_max: 300.0,
        rpm_min: 0.0,
        rpm_max: 300.0,
        doc_value: 0.0,
        expected_exit: None,
    };

    /// All scenarios whose boundary crosses the plot.
    pub fn renderable() -> [Scenario; 3] {
        [STANDARD, STEEP, OFFSET]
    }
}
