/// Client printing every message pushed by the server
use anyhow::{Context, Result};
use clap::{builder::RangedU64ValueParser, Parser};
use lenframe_protocol::{MessageReader, TextFrameCodec, DEFAULT_CHUNK_SIZE};
use tokio::net::TcpStream;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod receiver;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Remote server to connect to
    #[arg(short, long, default_value = "127.0.0.1:1234")]
    addr: String,

    /// Bytes requested per read
    #[arg(short, long, default_value_t = DEFAULT_CHUNK_SIZE, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    chunk_size: usize,

    /// Reject messages longer than this many bytes
    #[arg(short, long)]
    max_length: Option<usize>,
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
    let stream = TcpStream::connect(&args.addr)
        .await
        .with_context(|| format!("failed to connect to {}", args.addr))?;
    info!(addr = %stream.peer_addr()?, "connected");

    let codec = args
        .max_length
        .map(TextFrameCodec::new_with_max_length)
        .unwrap_or_default();
    let mut reader = MessageReader::with_codec(stream, codec, args.chunk_size);
    receiver::print_messages(&mut reader, &mut std::io::stdout()).await?;
    Ok(())
}
