//! Request/response invocation: JSON event in, base64 PNG envelope out.

use std::collections::BTreeMap;
use std::time::Instant;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use doc_common::{ChartSpec, DocError, DocResult, DEFAULT_FONT_SIZE, DEFAULT_SAMPLE_COUNT};
use renderer::{ChartRenderer, RenderedChart};

use crate::metrics::{record_render, Outcome};

pub const CONTENT_TYPE_PNG: &str = "image/png";
pub const CONTENT_TYPE_JSON: &str = "application/json";

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}

/// Chart parameters as they arrive in an invocation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub rop_min: f64,
    pub rop_max: f64,
    pub rpm_min: f64,
    pub rpm_max: f64,
    pub doc_value: f64,
    /// Drawn in the high-DOC region, above the boundary.
    pub text_above_line: String,
    /// Drawn in the low-DOC region, below the boundary.
    pub text_below_line: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

impl ChartRequest {
    pub fn from_value(event: Value) -> DocResult<Self> {
        Ok(serde_json::from_value(event)?)
    }

    /// Parse a raw request body.
    pub fn from_slice(body: &[u8]) -> DocResult<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    pub fn to_spec(&self, sample_count: usize) -> DocResult<ChartSpec> {
        ChartSpec::builder(
            self.rop_min,
            self.rop_max,
            self.rpm_min,
            self.rpm_max,
            self.doc_value,
        )
        .text_above_line(self.text_above_line.clone())
        .text_below_line(self.text_below_line.clone())
        .font_size(self.font_size)
        .sample_count(sample_count)
        .build()
    }
}

/// Invocation response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ChartResponse {
    /// 200 with the PNG base64-encoded.
    pub fn png(png: &[u8]) -> Self {
        Self {
            status_code: 200,
            headers: content_type(CONTENT_TYPE_PNG),
            body: STANDARD.encode(png),
            is_base64_encoded: true,
        }
    }

    /// Error envelope: `{"error": code, "message": text}` with the mapped status.
    pub fn error(err: &DocError) -> Self {
        Self {
            status_code: err.http_status_code(),
            headers: content_type(CONTENT_TYPE_JSON),
            body: error_body(err).to_string(),
            is_base64_encoded: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    /// Decode the body of a successful response back to PNG bytes.
    pub fn decode_png(&self) -> DocResult<Vec<u8>> {
        if !self.is_base64_encoded {
            return Err(DocError::InvalidRequest("response body is not base64".to_string()));
        }
        STANDARD
            .decode(&self.body)
            .map_err(|e| DocError::InvalidRequest(format!("invalid base64 body: {}", e)))
    }
}

fn content_type(value: &str) -> BTreeMap<String, String> {
    BTreeMap::from([("Content-Type".to_string(), value.to_string())])
}

/// JSON error body shared by the envelope and the raw HTTP routes.
pub fn error_body(err: &DocError) -> Value {
    json!({
        "error": err.error_code(),
        "message": err.to_string(),
    })
}

/// Renders invocation events with a shared renderer.
#[derive(Debug, Clone)]
pub struct ChartService {
    renderer: ChartRenderer,
    sample_count: usize,
}

impl ChartService {
    pub fn new(renderer: ChartRenderer, sample_count: usize) -> Self {
        Self {
            renderer,
            sample_count,
        }
    }

    pub fn renderer(&self) -> &ChartRenderer {
        &self.renderer
    }

    /// Validate and render a parsed request.
    pub fn render(&self, request: &ChartRequest) -> DocResult<RenderedChart> {
        let spec = request.to_spec(self.sample_count)?;
        self.renderer.render(&spec)
    }

    /// Parse, validate, and render an event, recording metrics either way.
    pub fn render_event(&self, event: Value) -> DocResult<RenderedChart> {
        self.observe(|| ChartRequest::from_value(event).and_then(|request| self.render(&request)))
    }

    /// As `render_event`, for a raw body that may not be JSON at all.
    pub fn render_body(&self, body: &[u8]) -> DocResult<RenderedChart> {
        self.observe(|| ChartRequest::from_slice(body).and_then(|request| self.render(&request)))
    }

    fn observe(&self, run: impl FnOnce() -> DocResult<RenderedChart>) -> DocResult<RenderedChart> {
        let start = Instant::now();
        let result = run();

        match &result {
            Ok(chart) => {
                record_render(Outcome::Success, start.elapsed());
                info!(
                    png_bytes = chart.png.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Chart rendered"
                );
            }
            Err(err) => {
                let outcome = if err.is_validation() {
                    Outcome::InvalidInput
                } else {
                    Outcome::RenderError
                };
                record_render(outcome, start.elapsed());
                warn!(code = err.error_code(), error = %err, "Chart invocation failed");
            }
        }
        result
    }

    /// Every outcome becomes an envelope; nothing is thrown to the caller.
    pub fn invoke(&self, event: Value) -> ChartResponse {
        match self.render_event(event) {
            Ok(chart) => ChartResponse::png(&chart.png),
            Err(err) => ChartResponse::error(&err),
        }
    }
}

/// One-shot invocation with the default sample count.
pub fn invoke(event: Value, renderer: &ChartRenderer) -> ChartResponse {
    ChartService::new(renderer.clone(), DEFAULT_SAMPLE_COUNT).invoke(event)
}
