//! Closed-form boundary between the engaged and not-engaged regions.
//!
//! The level set `doc(r, p) = T` is the ray `p = 5 T r` (r ≥ 0), so the
//! annotation anchors are computed directly instead of being read back from
//! a traced contour path.

use serde::{Deserialize, Serialize};

use crate::range::AxisRange;
use crate::threshold::{Threshold, BOUNDARY_SLOPE_FACTOR};

/// A point in (RPM, ROP) data space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub rpm: f64,
    pub rop: f64,
}

impl DataPoint {
    pub fn new(rpm: f64, rop: f64) -> Self {
        Self { rpm, rop }
    }
}

/// The ray `rop = slope * rpm` starting at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryRay {
    slope: f64,
}

impl BoundaryRay {
    pub fn from_threshold(threshold: Threshold) -> Self {
        Self {
            slope: BOUNDARY_SLOPE_FACTOR * threshold.value(),
        }
    }

    /// ft/hr per rev/min.
    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn rop_at(&self, rpm: f64) -> f64 {
        self.slope * rpm
    }

    pub fn rpm_at(&self, rop: f64) -> f64 {
        rop / self.slope
    }

    /// Part of the ray inside the rectangle `rpm × rop`.
    ///
    /// Returns `None` when the ray misses the rectangle or only touches it at
    /// a single point.
    pub fn clip(&self, rpm: &AxisRange, rop: &AxisRange) -> Option<BoundarySegment> {
        let exit_rpm = rpm.max.min(self.rpm_at(rop.max));
        let entry_rpm = rpm.min.max(self.rpm_at(rop.min)).max(0.0);

        if !(entry_rpm < exit_rpm) {
            return None;
        }

        // Pin coordinates that sit exactly on an edge.
        let exit = if exit_rpm == rpm.max {
            DataPoint::new(exit_rpm, self.rop_at(exit_rpm))
        } else {
            DataPoint::new(exit_rpm, rop.max)
        };
        let entry = if entry_rpm == rpm.min || entry_rpm == 0.0 {
            DataPoint::new(entry_rpm, self.rop_at(entry_rpm))
        } else {
            DataPoint::new(entry_rpm, rop.min)
        };
        let midpoint = DataPoint::new(
            (entry.rpm + exit.rpm) / 2.0,
            self.rop_at((entry.rpm + exit.rpm) / 2.0),
        );

        Some(BoundarySegment {
            entry,
            midpoint,
            exit,
        })
    }
}

/// Visible part of the boundary ray plus its annotation anchors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundarySegment {
    /// Where the ray enters the plotted rectangle.
    pub entry: DataPoint,
    /// Halfway between entry and exit.
    pub midpoint: DataPoint,
    /// Where the ray leaves the plotted rectangle (`rpm = rpm_max` or
    /// `rop = rop_max`, whichever comes first).
    pub exit: DataPoint,
}
