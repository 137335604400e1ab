//! Axis ranges and linear sampling.

use serde::{Deserialize, Serialize};

use crate::error::{Axis, DocError, DocResult};

/// Closed interval `[min, max]` for one chart axis.
///
/// Always satisfies `min < max` with both bounds finite; construct through
/// [`AxisRange::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Create a validated range for `axis`.
    pub fn new(axis: Axis, min: f64, max: f64) -> DocResult<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(DocError::InvalidRange { axis, min, max });
        }
        Ok(Self { min, max })
    }

    /// Width of the interval.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether a value lies inside the interval (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Value at fraction `t` of the span, measured from `min`.
    pub fn fraction(&self, t: f64) -> f64 {
        self.min + self.span() * t
    }

    /// Inverse of [`fraction`](Self::fraction).
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }

    /// `n` evenly spaced samples including both endpoints.
    ///
    /// The last sample is pinned to `max` so the endpoints are exact.
    pub fn linspace(&self, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![self.min],
            _ => {
                let step = self.span() / (n - 1) as f64;
                let mut samples: Vec<f64> =
                    (0..n).map(|i| self.min + i as f64 * step).collect();
                samples[n - 1] = self.max;
                samples
            }
        }
    }
}
