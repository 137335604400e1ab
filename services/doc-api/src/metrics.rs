//! Render metrics, exported through the Prometheus recorder when installed.

use std::time::Duration;

use metrics::{counter, histogram};

pub const RENDERS_TOTAL: &str = "doc_chart_renders_total";
pub const RENDER_DURATION_MS: &str = "doc_chart_render_duration_ms";

/// Result class of one invocation, used as the `outcome` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    InvalidInput,
    RenderError,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::InvalidInput => "invalid_input",
            Outcome::RenderError => "render_error",
        }
    }
}

/// Count one invocation and record how long it took.
pub fn record_render(outcome: Outcome, elapsed: Duration) {
    counter!(RENDERS_TOTAL, "outcome" => outcome.as_str()).increment(1);
    histogram!(RENDER_DURATION_MS).record(elapsed.as_secs_f64() * 1000.0);
}
