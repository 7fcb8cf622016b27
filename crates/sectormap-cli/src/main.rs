mod cli;
mod error;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use sectormap_core::ReqwestHttpClient;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let config = cli.pipeline_config();
    tracing::debug!(?config, "resolved configuration");
    let aggregator = config.aggregator(Arc::new(ReqwestHttpClient::new()))?;

    let outcome = aggregator.run().await;
    let path = config.writer().write(&outcome.snapshot)?;

    let summary = serde_json::json!({
        "output": path.display().to_string(),
        "source": config.source,
        "report": outcome.report,
    });
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{rendered}");

    Ok(ExitCode::SUCCESS)
}
