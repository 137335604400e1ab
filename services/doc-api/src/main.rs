//! DOC chart HTTP service.
//!
//! Serves the request/response invocation over HTTP, plus a raw PNG route,
//! health and Prometheus metrics.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use doc_api::config::{log_filter, RenderArgs};
use doc_api::{create_app, AppState};

#[derive(Parser, Debug)]
#[command(name = "doc-api")]
#[command(about = "DOC drilling chart API server")]
struct Args {
    /// Listen address
    #[arg(short, long, env = "DOC_API_LISTEN", default_value = "0.0.0.0:8080")]
    listen: String,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long)]
    worker_threads: Option<usize>,

    #[command(flatten)]
    render: RenderArgs,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    } else if let Ok(threads) = env::var("TOKIO_WORKER_THREADS") {
        if let Ok(threads) = threads.parse::<usize>() {
            runtime_builder.worker_threads(threads);
        }
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(args))?;
    Ok(())
}

async fn async_main(args: Args) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(&args.log_level))
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("installing Prometheus recorder")?;

    info!("Prometheus metrics exporter initialized");
    info!("Starting DOC chart API server");

    let state = Arc::new(AppState::from_args(&args.render)?);
    let app = create_app(state, prometheus_handle);

    let addr: SocketAddr = args.listen.parse()?;
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
