mod script;

use anyhow::Context;
use clap::Parser;
use flashlight_shared::FrameEncoder;
use script::{demo_script, Step};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Device simulator that plays a fixed TLV command script to each client
#[derive(Debug, Parser)]
#[command(name = "server", about)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:9999")]
    bind: SocketAddr,

    /// Seconds to wait at the script's pause step
    #[arg(long, default_value_t = 5)]
    delay_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let args = Args::parse();
    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!("Server listening on {}", args.bind);

    let delay = Duration::from_secs(args.delay_secs);
    loop {
        let (socket, addr) = listener.accept().await?;
        info!("Connection from: {}", addr);

        tokio::spawn(async move {
            if let Err(e) = play(socket, delay).await {
                error!("Session with {} failed: {:#}", addr, e);
            }
            info!("Client disconnected: {}", addr);
        });
    }
}

/// Write each script step separately, then close the connection
async fn play(mut socket: TcpStream, delay: Duration) -> anyhow::Result<()> {
    let mut encoder = FrameEncoder::new();

    for step in demo_script() {
        match &step {
            Step::Pause => {
                info!("Pausing for {:?}", delay);
                tokio::time::sleep(delay).await;
            }
            Step::Frame(command) => info!("Sending: {}", command),
            Step::Noise(bytes) => info!("Sending {} noise bytes", bytes.len()),
        }

        let bytes = step.to_bytes(&mut encoder);
        if !bytes.is_empty() {
            socket.write_all(&bytes).await.context("write failed")?;
        }
    }

    socket.shutdown().await.context("shutdown failed")?;
    Ok(())
}
