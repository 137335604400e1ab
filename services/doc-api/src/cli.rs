//! Direct-call chart generation.
//!
//! Renders one chart from command-line parameters and writes it to a PNG
//! file, or prints the invocation envelope the HTTP surface would return.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing::info;

use doc_common::{ChartSpec, DEFAULT_FONT_SIZE, DEFAULT_TEXT_ABOVE_LINE, DEFAULT_TEXT_BELOW_LINE};
use renderer::ChartRenderer;

use crate::config::RenderArgs;
use crate::invocation::{ChartResponse, ChartService};

#[derive(Parser, Debug, Clone)]
#[command(name = "doc-chart")]
#[command(about = "Render a Depth of Cut drilling chart")]
#[command(allow_negative_numbers = true)]
pub struct CliArgs {
    /// Lowest rate of penetration on the chart (ft/hr)
    #[arg(long)]
    pub rop_min: f64,

    /// Highest rate of penetration on the chart (ft/hr)
    #[arg(long)]
    pub rop_max: f64,

    /// Lowest rotary speed on the chart (rev/min)
    #[arg(long)]
    pub rpm_min: f64,

    /// Highest rotary speed on the chart (rev/min)
    #[arg(long)]
    pub rpm_max: f64,

    /// DOC threshold (in/rev)
    #[arg(long)]
    pub doc_value: f64,

    /// Annotation font size in points
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    pub font_size: f32,

    /// Text for the region above the boundary
    #[arg(long, default_value = DEFAULT_TEXT_ABOVE_LINE)]
    pub text_above: String,

    /// Text for the region below the boundary
    #[arg(long, default_value = DEFAULT_TEXT_BELOW_LINE)]
    pub text_below: String,

    /// Output PNG path
    #[arg(short, long, default_value = "doc_chart.png")]
    pub output: PathBuf,

    /// Print the invocation envelope as JSON instead of writing a file
    #[arg(long)]
    pub envelope: bool,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(flatten)]
    pub render: RenderArgs,
}

impl CliArgs {
    pub fn to_spec(&self) -> Result<ChartSpec> {
        let spec = ChartSpec::builder(
            self.rop_min,
            self.rop_max,
            self.rpm_min,
            self.rpm_max,
            self.doc_value,
        )
        .text_above_line(unescape(&self.text_above))
        .text_below_line(unescape(&self.text_below))
        .font_size(self.font_size)
        .sample_count(self.render.sample_count()?)
        .build()?;
        Ok(spec)
    }

    /// The same parameters as an invocation event.
    pub fn to_event(&self) -> serde_json::Value {
        json!({
            "rop_min": self.rop_min,
            "rop_max": self.rop_max,
            "rpm_min": self.rpm_min,
            "rpm_max": self.rpm_max,
            "doc_value": self.doc_value,
            "text_above_line": unescape(&self.text_above),
            "text_below_line": unescape(&self.text_below),
            "font_size": self.font_size,
        })
    }
}

/// Shells rarely pass real newlines; accept a literal `\n` as a line break.
fn unescape(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// What a direct call produced.
#[derive(Debug)]
pub enum CliOutput {
    File { path: PathBuf, bytes: usize },
    Envelope(ChartResponse),
}

/// Render per the arguments. Invalid parameters surface as errors here,
/// except in envelope mode where they become the envelope.
pub fn run(args: &CliArgs) -> Result<CliOutput> {
    let renderer = ChartRenderer::new(args.render.chart_style()?)?;

    if args.envelope {
        let service = ChartService::new(renderer, args.render.sample_count()?);
        return Ok(CliOutput::Envelope(service.invoke(args.to_event())));
    }

    let spec = args.to_spec()?;
    let chart = renderer.render(&spec)?;
    fs::write(&args.output, &chart.png)
        .with_context(|| format!("writing chart to {}", args.output.display()))?;

    info!(
        path = %args.output.display(),
        bytes = chart.png.len(),
        title = %spec.title(),
        "Chart written"
    );
    Ok(CliOutput::File {
        path: args.output.clone(),
        bytes: chart.png.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_newlines() {
        assert_eq!(unescape("a\\nb"), "a\nb");
        assert_eq!(unescape("plain"), "plain");
    }

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from([
            "doc-chart", "--rop-min", "0", "--rop-max", "300", "--rpm-min", "0", "--rpm-max", "300",
            "--doc-value", "0.15",
        ])
        .unwrap();
        assert_eq!(args.font_size, 20.0);
        assert_eq!(args.output, PathBuf::from("doc_chart.png"));
        assert_eq!(args.text_below, DEFAULT_TEXT_BELOW_LINE);
        assert!(!args.envelope);
    }
}
