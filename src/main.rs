use clap::Parser;
use flashlight::cli::Cli;
use flashlight::{LoggingDispatcher, Pipeline, PipelineStats};

use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();

    // Errors are logged; the exit status is always 0
    if let Err(e) = run(cli).await {
        error!("error: {}", e);
    }
}

async fn run(cli: Cli) -> anyhow::Result<PipelineStats> {
    let pipeline = Pipeline::new(cli.into_config());
    let config = pipeline.config();
    info!("Flashlight client starting: {}:{}", config.host, config.port);

    let stats = pipeline
        .run(config.tcp_connector(), LoggingDispatcher)
        .await?;

    info!(
        "Stream closed: {} commands from {} bytes",
        stats.commands_dispatched, stats.bytes_read
    );
    Ok(stats)
}
