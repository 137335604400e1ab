//! Application state and shared resources.

use anyhow::Result;

use renderer::ChartRenderer;

use crate::config::RenderArgs;
use crate::invocation::ChartService;

/// Shared application state.
///
/// Read-only after startup; the font is loaded once and shared by every
/// render.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: ChartService,
}

impl AppState {
    pub fn new(service: ChartService) -> Self {
        Self { service }
    }

    pub fn from_args(args: &RenderArgs) -> Result<Self> {
        let sample_count = args.sample_count()?;
        let renderer = ChartRenderer::new(args.chart_style()?)?;
        if !renderer.has_font() {
            tracing::warn!("Serving charts without text; set DOC_CHART_FONT to a TrueType font");
        }
        Ok(Self::new(ChartService::new(renderer, sample_count)))
    }
}
