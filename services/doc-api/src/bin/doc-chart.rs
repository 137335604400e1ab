//! Render one DOC chart from the command line.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::FmtSubscriber;

use doc_api::cli::{self, CliArgs, CliOutput};
use doc_api::config::log_filter;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(&args.log_level))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli::run(&args)? {
        CliOutput::File { path, bytes } => {
            eprintln!("Wrote {} ({} bytes)", path.display(), bytes);
        }
        CliOutput::Envelope(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}
