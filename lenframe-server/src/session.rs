/// Per-connection push sessions
use futures::SinkExt;
use lenframe_protocol::{Error, TextFrameCodec};
use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};
use time::OffsetDateTime;
use tokio::{
    io::AsyncWrite,
    net::{TcpListener, TcpStream},
    time::{interval_at, Instant, MissedTickBehavior},
};
use tokio_util::codec::FramedWrite;
use tracing::{debug, info, warn};

pub(crate) const DEFAULT_GREETING: &str = "Witam na moim serwerze!";

#[derive(Clone, Debug)]
pub(crate) struct SessionConfig {
    pub greeting: String,
    pub interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.into(),
            interval: Duration::from_secs(3),
        }
    }
}

/// Accepts connections forever, one task per client. Only accept errors
/// end the loop.
pub(crate) async fn serve(listener: TcpListener, config: SessionConfig) -> anyhow::Result<()> {
    let config = Arc::new(config);
    let client_id = AtomicUsize::from(0);

    loop {
        let (stream, addr) = listener.accept().await?;
        tokio::spawn(handle_client(
            client_id.fetch_add(1, Ordering::Relaxed),
            stream,
            addr,
            Arc::clone(&config),
        ));
    }
}

async fn handle_client(
    client_id: usize,
    stream: TcpStream,
    addr: SocketAddr,
    config: Arc<SessionConfig>,
) {
    info!(%addr, client_id, "connection established");
    if let Err(e) = push_messages(stream, &config).await {
        if e.is_disconnect() {
            info!(%addr, client_id, "client disconnected");
        } else {
            warn!(%addr, client_id, error = %e, "session failed");
        }
    }
}

/// Sends the greeting, then a status message every `config.interval` until a
/// send fails.
pub(crate) async fn push_messages<W>(writer: W, config: &SessionConfig) -> Result<(), Error>
where
    W: AsyncWrite + Unpin,
{
    let mut writer = FramedWrite::new(writer, TextFrameCodec::default());
    writer.send(config.greeting.as_str()).await?;

    let mut ticker = interval_at(Instant::now() + config.interval, config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let status = status_message(OffsetDateTime::now_utc());
        debug!(%status, "sending status");
        writer.send(status).await?;
    }
}

pub(crate) fn status_message(now: OffsetDateTime) -> String {
    format!("The time is {}.{:06}", now.unix_timestamp(), now.microsecond())
}
