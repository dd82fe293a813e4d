/// Receive loop printing every message on its own line
use lenframe_protocol::{Error, MessageReader};
use std::io::Write;
use tokio::io::AsyncRead;
use tracing::info;

/// Prints messages until the server closes the connection. Returns how many
/// were printed.
pub(crate) async fn print_messages<R, W>(
    reader: &mut MessageReader<R>,
    out: &mut W,
) -> Result<usize, Error>
where
    R: AsyncRead + Unpin,
    W: Write,
{
    let mut count = 0;
    while let Some(message) = reader.next_message().await? {
        writeln!(out, "{}", message)?;
        count += 1;
    }
    info!(count, "server closed connection");
    Ok(count)
}
