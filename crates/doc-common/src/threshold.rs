//! DOC formula, threshold, and engaged/not-engaged classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DocError, DocResult};

/// Inches per foot.
const INCHES_PER_FOOT: f64 = 12.0;

/// Minutes per hour.
const MINUTES_PER_HOUR: f64 = 60.0;

/// Slope factor of the boundary ray: `p = 5 * T * r` (60 / 12).
pub const BOUNDARY_SLOPE_FACTOR: f64 = MINUTES_PER_HOUR / INCHES_PER_FOOT;

/// Depth of cut in inches per revolution.
///
/// `rpm` is rotary speed (rev/min), `rop` is rate of penetration (ft/hr).
/// Zero rotary speed has no defined depth of cut and maps to `f64::INFINITY`.
#[inline]
pub fn doc(rpm: f64, rop: f64) -> f64 {
    if rpm != 0.0 {
        (rop * INCHES_PER_FOOT) / (rpm * MINUTES_PER_HOUR)
    } else {
        f64::INFINITY
    }
}

/// DOC threshold (`doc_value`, in/rev) separating the two chart regions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    /// Create a threshold; it must be positive and finite.
    pub fn new(doc_value: f64) -> DocResult<Self> {
        if !doc_value.is_finite() || doc_value <= 0.0 {
            return Err(DocError::InvalidThreshold(doc_value));
        }
        Ok(Self(doc_value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Threshold {
    type Error = DocError;

    fn try_from(value: f64) -> DocResult<Self> {
        Self::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(threshold: Threshold) -> Self {
        threshold.0
    }
}

/// Formats like the chart labels: whole numbers keep one decimal (`1.0`).
impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Which side of the threshold a grid cell falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Finite DOC at or below the threshold.
    Engaged,
    /// DOC above the threshold, including the zero-RPM sentinel.
    NotEngaged,
}

/// Classify a single DOC value against the threshold.
#[inline]
pub fn classify(doc_value: f64, threshold: Threshold) -> Classification {
    if doc_value.is_finite() && doc_value <= threshold.value() {
        Classification::Engaged
    } else {
        Classification::NotEngaged
    }
}
