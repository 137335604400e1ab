//! Shared test utilities for the doc-chart workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Canonical chart scenarios and request bodies
//! - PNG decoding and pixel inspection helpers
//! - Approximate float assertions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_approx_eq, fixtures};
//! ```

pub mod fixtures;
pub mod images;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use images::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Relative-tolerance variant of [`assert_approx_eq!`]; falls back to an
/// absolute check when `right` is zero.
#[macro_export]
macro_rules! assert_rel_eq {
    ($left:expr, $right:expr, $rel:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let rel: f64 = $rel as f64;
        let scale = if right == 0.0 { 1.0 } else { right.abs() };
        if (left - right).abs() > rel * scale {
            panic!(
                "assertion failed: `(left ≈ right)` (relative)\n  left: `{:?}`,\n right: `{:?}`,\n   rel: `{:?}`",
                left, right, rel
            );
        }
    }};
}

/// Macro for approximate equality of (rpm, rop) pairs.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_point_approx_eq;
///
/// assert_point_approx_eq!((300.0001, 225.0), (300.0, 225.0), 0.001);
/// ```
#[macro_export]
macro_rules! assert_point_approx_eq {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($x1, $x2, $epsilon);
        $crate::assert_approx_eq!($y1, $y2, $epsilon);
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_assert_rel_eq() {
        assert_rel_eq!(1e9 + 0.5, 1e9, 1e-9);
        assert_rel_eq!(0.0, 0.0, 1e-9);
    }

    #[test]
    fn test_assert_point_approx_eq_passes() {
        assert_point_approx_eq!((300.0001, 225.0001), (300.0, 225.0), 0.001);
    }
}
