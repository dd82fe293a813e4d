/// Protocol definitions for streaming length-prefixed text messages
///
/// Every message on the wire is a frame made of a fixed-width header followed
/// by the UTF-8 payload:
///
/// ```ignore
/// <decimal byte length, left-justified, space-padded to 10 bytes><payload>
/// ```
///
/// For example `hello` is sent as `5         hello`. The header width is a
/// protocol constant shared by both ends; it is never negotiated.
use thiserror::Error;

mod codec;
mod header;
mod reader;
mod util;

pub use codec::{decode, encode, TextFrameCodec};
pub use header::{HEADER_WIDTH, MAX_PAYLOAD_LEN};
pub use reader::{MessageReader, DEFAULT_CHUNK_SIZE};

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("invalid header: {0:?}")]
    InvalidHeader(String),

    #[error("payload of {len} bytes exceeds limit of {max} bytes")]
    PayloadTooLarge { len: u64, max: u64 },

    #[error("payload is not valid utf-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("stream closed inside a frame ({buffered} bytes buffered)")]
    Truncated { buffered: usize },

    #[error("{0} trailing bytes after frame")]
    TrailingBytes(usize),
}

impl Error {
    /// True if the error means the peer went away rather than misbehaved
    pub fn is_disconnect(&self) -> bool {
        use std::io::ErrorKind::*;
        match self {
            Error::IoError(e) => matches!(
                e.kind(),
                BrokenPipe | ConnectionReset | ConnectionAborted | UnexpectedEof
            ),
            Error::Truncated { .. } => true,
            _ => false,
        }
    }
}
