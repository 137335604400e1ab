//! Tests for the grid & classification engine.

use doc_common::{
    doc, evaluate, Axis, AxisRange, BoundaryRay, ChartSpec, Classification, DocError, DocField,
    SampleGrid, Threshold,
};
use test_utils::{assert_point_approx_eq, assert_rel_eq, scenarios, Scenario};

fn spec_for(s: &Scenario) -> Result<ChartSpec, DocError> {
    ChartSpec::new(s.rop_min, s.rop_max, s.rpm_min, s.rpm_max, s.doc_value)
}

fn small_spec(s: &Scenario, n: usize) -> ChartSpec {
    ChartSpec::builder(s.rop_min, s.rop_max, s.rpm_min, s.rpm_max, s.doc_value)
        .sample_count(n)
        .build()
        .unwrap()
}

// ============================================================================
// Grid construction
// ============================================================================

#[test]
fn test_grid_has_n_squared_cells_and_exact_endpoints() {
    for (n, rpm, rop) in [
        (2, (0.0, 1.0), (0.0, 1.0)),
        (17, (10.0, 250.0), (5.5, 400.25)),
        (1000, (0.0, 300.0), (0.0, 300.0)),
    ] {
        let rpm = AxisRange::new(Axis::Rpm, rpm.0, rpm.1).unwrap();
        let rop = AxisRange::new(Axis::Rop, rop.0, rop.1).unwrap();
        let grid = SampleGrid::new(&rpm, &rop, n).unwrap();

        assert_eq!(grid.cell_count(), n * n);
        assert_eq!(grid.rpm_samples().first(), Some(&rpm.min));
        assert_eq!(grid.rpm_samples().last(), Some(&rpm.max));
        assert_eq!(grid.rop_samples().first(), Some(&rop.min));
        assert_eq!(grid.rop_samples().last(), Some(&rop.max));

        let rpm_mesh = grid.rpm_mesh();
        let rop_mesh = grid.rop_mesh();
        let min = rpm_mesh.iter().copied().fold(f64::INFINITY, f64::min);
        let max = rpm_mesh.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!((min, max), (rpm.min, rpm.max));
        let min = rop_mesh.iter().copied().fold(f64::INFINITY, f64::min);
        let max = rop_mesh.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!((min, max), (rop.min, rop.max));
    }
}

#[test]
fn test_rows_constant_in_rop_columns_constant_in_rpm() {
    let spec = small_spec(&scenarios::OFFSET, 9);
    let grid = SampleGrid::new(&spec.rpm, &spec.rop, 9).unwrap();
    let rpm = grid.rpm_mesh();
    let rop = grid.rop_mesh();
    for row in 0..9 {
        for col in 0..9 {
            assert_eq!(rop[row * 9 + col], rop[row * 9]);
            assert_eq!(rpm[row * 9 + col], rpm[col]);
        }
    }
}

// ============================================================================
// DOC field
// ============================================================================

#[test]
fn test_field_matches_formula() {
    let spec = small_spec(&scenarios::STANDARD, 101);
    let grid = SampleGrid::new(&spec.rpm, &spec.rop, 101).unwrap();
    let field = DocField::evaluate(&grid);

    for row in 0..101 {
        for col in 0..101 {
            let r = grid.rpm_at(row, col);
            let p = grid.rop_at(row, col);
            let v = field.get(row, col);
            if r > 0.0 {
                assert_rel_eq!(v, (p * 12.0) / (r * 60.0), 1e-9);
            } else {
                assert_eq!(v, f64::INFINITY);
            }
        }
    }
}

#[test]
fn test_zero_rpm_cells_never_engaged() {
    // Even a huge threshold cannot engage a zero-rpm cell
    let spec = small_spec(&scenarios::STANDARD, 51);
    let grid = SampleGrid::new(&spec.rpm, &spec.rop, 51).unwrap();
    let classes = DocField::evaluate(&grid).classify(Threshold::new(1e12).unwrap());
    for row in 0..51 {
        assert_eq!(classes.get(row, 0), Classification::NotEngaged);
    }
    // every other cell is engaged at that threshold
    assert_eq!(classes.engaged_count(), 51 * 50);
}

#[test]
fn test_classification_agrees_with_ray_side() {
    let threshold = Threshold::new(0.15).unwrap();
    let ray = BoundaryRay::from_threshold(threshold);
    for (r, p) in [(100.0, 10.0), (100.0, 74.0), (100.0, 76.0), (300.0, 300.0), (1.0, 0.0)] {
        let expected = if p <= ray.rop_at(r) {
            Classification::Engaged
        } else {
            Classification::NotEngaged
        };
        assert_eq!(doc_common::classify(doc(r, p), threshold), expected, "({}, {})", r, p);
    }
}

#[test]
fn test_engine_is_bit_identical_across_calls() {
    let spec = small_spec(&scenarios::OFFSET, 200);
    let a = evaluate(&spec).unwrap();
    let b = evaluate(&spec).unwrap();
    assert_eq!(a.grid, b.grid);
    let bits_a: Vec<u64> = a.field.values().iter().map(|v| v.to_bits()).collect();
    let bits_b: Vec<u64> = b.field.values().iter().map(|v| v.to_bits()).collect();
    assert_eq!(bits_a, bits_b);
}

// ============================================================================
// Boundary ray
// ============================================================================

#[test]
fn test_boundary_points_lie_on_ray() {
    for t in [0.01, 0.05, 0.15, 0.5, 1.0, 3.0] {
        let ray = BoundaryRay::from_threshold(Threshold::new(t).unwrap());
        let spec = ChartSpec::new(0.0, 300.0, 0.0, 300.0, t).unwrap();
        let seg = ray.clip(&spec.rpm, &spec.rop).unwrap();
        for pt in [seg.entry, seg.midpoint, seg.exit] {
            assert_rel_eq!(pt.rop, 5.0 * t * pt.rpm, 1e-12);
        }
    }
}

#[test]
fn test_canonical_exit_points() {
    for s in scenarios::renderable() {
        let eval = evaluate(&small_spec(&s, 10)).unwrap();
        let (r, p) = s.expected_exit.unwrap();
        assert_point_approx_eq!((eval.boundary.exit.rpm, eval.boundary.exit.rop), (r, p), 1e-9);
    }
}

#[test]
fn test_standard_scenario_exits_right_edge_not_top() {
    let eval = evaluate(&small_spec(&scenarios::STANDARD, 10)).unwrap();
    assert_eq!(eval.boundary.exit.rpm, 300.0);
    assert!(eval.boundary.exit.rop < 300.0);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_inverted_rpm_range_fails() {
    let err = spec_for(&scenarios::INVERTED_RPM).unwrap_err();
    assert!(matches!(err, DocError::InvalidRange { axis: Axis::Rpm, min, max } if min == 100.0 && max == 50.0));
}

#[test]
fn test_inverted_rop_range_fails() {
    let err = ChartSpec::new(300.0, 0.0, 0.0, 300.0, 0.15).unwrap_err();
    assert!(matches!(err, DocError::InvalidRange { axis: Axis::Rop, .. }));
}

#[test]
fn test_zero_threshold_fails() {
    let err = spec_for(&scenarios::ZERO_THRESHOLD).unwrap_err();
    assert!(matches!(err, DocError::InvalidThreshold(v) if v == 0.0));
}

#[test]
fn test_ray_missing_plot_is_rendering_failure() {
    let spec = small_spec(&scenarios::MISSES_PLOT, 10);
    let err = evaluate(&spec).unwrap_err();
    assert!(matches!(err, DocError::RenderingFailure(_)));
    assert_eq!(err.http_status_code(), 500);
}
