/// Server pushing a greeting and periodic status frames to every client
use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod session;

use session::{SessionConfig, DEFAULT_GREETING};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bind to this addr
    #[arg(short, long, default_value = "127.0.0.1:1234")]
    addr: String,

    /// Milliseconds between status messages
    #[arg(short, long, default_value_t = 3000, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: u64,

    /// First message sent to every client
    #[arg(short, long, default_value = DEFAULT_GREETING)]
    greeting: String,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let listener = TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("failed to bind {}", args.addr))?;
    info!(addr = %listener.local_addr()?, "listening");

    let config = SessionConfig {
        greeting: args.greeting,
        interval: Duration::from_millis(args.interval_ms),
    };
    session::serve(listener, config).await
}
