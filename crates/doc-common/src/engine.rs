//! Grid & classification pipeline: `ChartSpec` → grid → field → boundary.

use crate::boundary::{BoundaryRay, BoundarySegment};
use crate::chart::ChartSpec;
use crate::error::{DocError, DocResult};
use crate::grid::{ClassifiedField, DocField, SampleGrid};

/// Output of one engine run.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub grid: SampleGrid,
    pub field: DocField,
    pub classes: ClassifiedField,
    pub ray: BoundaryRay,
    pub boundary: BoundarySegment,
}

/// Run the full numeric pipeline for a validated spec.
///
/// Fails with `RenderingFailure` when the boundary ray does not cross the
/// plotted rectangle, since there is nothing to annotate.
pub fn evaluate(spec: &ChartSpec) -> DocResult<Evaluation> {
    let ray = BoundaryRay::from_threshold(spec.threshold);
    let boundary = ray.clip(&spec.rpm, &spec.rop).ok_or_else(|| {
        DocError::RenderingFailure(format!(
            "DOC boundary {} in/rev does not cross the plot area rpm [{}, {}] x rop [{}, {}]",
            spec.threshold, spec.rpm.min, spec.rpm.max, spec.rop.min, spec.rop.max
        ))
    })?;

    let grid = SampleGrid::new(&spec.rpm, &spec.rop, spec.sample_count)?;
    let field = DocField::evaluate(&grid);
    let classes = field.classify(spec.threshold);

    tracing::debug!(
        n = grid.n(),
        engaged = classes.engaged_count(),
        not_engaged = classes.not_engaged_count(),
        slope = ray.slope(),
        exit_rpm = boundary.exit.rpm,
        exit_rop = boundary.exit.rop,
        "Evaluated DOC field"
    );

    Ok(Evaluation {
        grid,
        field,
        classes,
        ray,
        boundary,
    })
}
