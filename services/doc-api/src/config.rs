//! Command-line and environment configuration shared by both binaries.

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing_subscriber::EnvFilter;

use doc_common::{DEFAULT_SAMPLE_COUNT, MAX_SAMPLE_COUNT};
use renderer::ChartStyle;

/// Rendering options. Every flag can also come from the environment.
#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// JSON file with a full chart style; flags below override it
    #[arg(long, env = "DOC_CHART_STYLE")]
    pub style: Option<String>,

    /// TrueType font for chart text (system fonts are searched otherwise)
    #[arg(long, env = "DOC_CHART_FONT")]
    pub font: Option<String>,

    /// Canvas width in pixels
    #[arg(long, env = "DOC_CHART_WIDTH")]
    pub width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long, env = "DOC_CHART_HEIGHT")]
    pub height: Option<u32>,

    /// Grid samples per axis
    #[arg(long, env = "DOC_CHART_SAMPLES")]
    pub samples: Option<usize>,

    /// Draw iso-DOC guide lines every N in/rev
    #[arg(long, env = "DOC_CHART_GUIDE_INTERVAL")]
    pub guide_interval: Option<f64>,
}

impl RenderArgs {
    /// Resolve the chart style: file (or defaults), then flag overrides.
    pub fn chart_style(&self) -> Result<ChartStyle> {
        let mut style = match &self.style {
            Some(path) => ChartStyle::from_file(path)
                .map_err(|e| anyhow::anyhow!("{}", e))
                .with_context(|| format!("loading chart style from {}", path))?,
            None => ChartStyle::default(),
        };

        if let Some(font) = &self.font {
            style.font_path = Some(font.clone());
        }
        if let Some(width) = self.width {
            style.width = width;
        }
        if let Some(height) = self.height {
            style.height = height;
        }
        if self.guide_interval.is_some() {
            style.guide_interval = self.guide_interval;
        }

        style.validate()?;
        Ok(style)
    }

    pub fn sample_count(&self) -> Result<usize> {
        let samples = self.samples.unwrap_or(DEFAULT_SAMPLE_COUNT);
        if !(2..=MAX_SAMPLE_COUNT).contains(&samples) {
            bail!(
                "sample count must be between 2 and {}, got {}",
                MAX_SAMPLE_COUNT,
                samples
            );
        }
        Ok(samples)
    }
}

/// `RUST_LOG` when set, otherwise the `--log-level` value.
pub fn log_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}
