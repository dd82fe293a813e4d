/// Chunked message reader
use crate::{codec::TextFrameCodec, Error};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::{bytes::BytesMut, codec::Decoder};
use tracing::trace;

/// Bytes requested per read call. Smaller than the header, so a header
/// routinely arrives over several reads.
pub const DEFAULT_CHUNK_SIZE: usize = 16;

/// Reads frames from a byte stream a small chunk at a time
#[derive(Debug)]
pub struct MessageReader<R> {
    inner: R,
    codec: TextFrameCodec,
    buffer: BytesMut,
    chunk_size: usize,
    eof: bool,
}

impl<R> MessageReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_codec(inner, TextFrameCodec::default(), DEFAULT_CHUNK_SIZE)
    }

    /// A `chunk_size` of zero is treated as one
    pub fn with_codec(inner: R, codec: TextFrameCodec, chunk_size: usize) -> Self {
        Self {
            inner,
            codec,
            buffer: BytesMut::new(),
            chunk_size: chunk_size.max(1),
            eof: false,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: AsyncRead + Unpin> MessageReader<R> {
    /// Waits for the next complete message.
    ///
    /// Returns `Ok(None)` once the peer has closed the stream between frames,
    /// and `Error::Truncated` if it closed in the middle of one.
    pub async fn next_message(&mut self) -> Result<Option<String>, Error> {
        loop {
            if self.eof {
                return self.codec.decode_eof(&mut self.buffer);
            }
            if let Some(message) = self.codec.decode(&mut self.buffer)? {
                return Ok(Some(message));
            }

            self.buffer.reserve(self.chunk_size);
            let read = (&mut self.inner)
                .take(self.chunk_size as u64)
                .read_buf(&mut self.buffer)
                .await?;
            trace!(read, buffered = self.buffer.len(), "read chunk");
            if read == 0 {
                self.eof = true;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::{MessageReader, DEFAULT_CHUNK_SIZE};
    use crate::{encode, Error, TextFrameCodec};
    use tokio::io::{duplex, AsyncWriteExt};

    #[tokio::test]
    async fn test_reads_greeting_and_status() {
        let (mut tx, rx) = duplex(64);
        tokio::spawn(async move {
            tx.write_all(&encode("Witam na moim serwerze!").unwrap())
                .await
                .unwrap();
            tx.write_all(&encode("The time is 1700000003.000001").unwrap())
                .await
                .unwrap();
        });

        let mut reader = MessageReader::new(rx);
        assert_eq!(reader.chunk_size(), DEFAULT_CHUNK_SIZE);
        assert_eq!(
            reader.next_message().await.unwrap().unwrap(),
            "Witam na moim serwerze!"
        );
        assert_eq!(
            reader.next_message().await.unwrap().unwrap(),
            "The time is 1700000003.000001"
        );
        assert!(reader.next_message().await.unwrap().is_none());
        // Stays closed instead of spinning
        assert!(reader.next_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_single_byte_reads() {
        // A one byte pipe delivers every frame one byte at a time
        let (mut tx, rx) = duplex(1);
        tokio::spawn(async move {
            tx.write_all(&encode("hello").unwrap()).await.unwrap();
        });

        let mut reader = MessageReader::with_codec(rx, TextFrameCodec::default(), 1);
        assert_eq!(reader.next_message().await.unwrap().unwrap(), "hello");
        assert!(reader.next_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_frames_in_one_write() {
        let (mut tx, rx) = duplex(256);
        let mut bytes = encode("first").unwrap().to_vec();
        bytes.extend_from_slice(&encode("second").unwrap());
        tx.write_all(&bytes).await.unwrap();
        drop(tx);

        let mut reader = MessageReader::with_codec(rx, TextFrameCodec::default(), 256);
        assert_eq!(reader.next_message().await.unwrap().unwrap(), "first");
        assert_eq!(reader.next_message().await.unwrap().unwrap(), "second");
        assert!(reader.next_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_closed_mid_header() {
        let (mut tx, rx) = duplex(64);
        tx.write_all(b"23      ").await.unwrap();
        drop(tx);

        let mut reader = MessageReader::new(rx);
        let result = reader.next_message().await;
        assert!(
            matches!(result, Err(Error::Truncated { buffered: 8 })),
            "{:?}",
            result
        );
    }

    #[tokio::test]
    async fn test_zero_chunk_size_is_clamped() {
        let (_tx, rx) = duplex(1);
        let reader = MessageReader::with_codec(rx, TextFrameCodec::default(), 0);
        assert_eq!(reader.chunk_size(), 1);
    }
}
