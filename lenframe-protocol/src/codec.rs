/// Codec for length-prefixed text frames
use crate::{
    header::{parse_header, write_header, HEADER_WIDTH, MAX_PAYLOAD_LEN},
    Error,
};
use tokio_util::{
    bytes::{Buf, BufMut, Bytes, BytesMut},
    codec::{Decoder, Encoder},
};
use tracing::debug;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum DecodeState {
    AwaitingHeader,
    AccumulatingBody { len: usize },
}

/// Encodes `&str`/`String` payloads into frames and decodes frames back into
/// `String`s.
///
/// Decoding consumes exactly the declared number of body bytes, so frames that
/// arrive back-to-back in one read are split correctly and whatever follows a
/// frame stays buffered for the next one.
#[derive(Debug)]
pub struct TextFrameCodec {
    state: DecodeState,
    max_length: u64,
}

impl Default for TextFrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFrameCodec {
    /// Codec accepting any payload the header can describe
    pub fn new() -> Self {
        Self {
            state: DecodeState::AwaitingHeader,
            max_length: MAX_PAYLOAD_LEN,
        }
    }

    /// Codec rejecting payloads longer than `max_length` bytes in both
    /// directions. Values above `MAX_PAYLOAD_LEN` are clamped.
    pub fn new_with_max_length(max_length: usize) -> Self {
        Self {
            state: DecodeState::AwaitingHeader,
            max_length: (max_length as u64).min(MAX_PAYLOAD_LEN),
        }
    }

    pub fn max_length(&self) -> u64 {
        self.max_length
    }

    fn check_length(&self, len: u64) -> Result<usize, Error> {
        let too_large = || Error::PayloadTooLarge {
            len,
            max: self.max_length,
        };
        if len > self.max_length {
            return Err(too_large());
        }
        usize::try_from(len).map_err(|_| too_large())
    }

    fn decode_header(&mut self, src: &mut BytesMut) -> Result<Option<usize>, Error> {
        if src.len() < HEADER_WIDTH {
            return Ok(None);
        }
        let len = self.check_length(parse_header(&src[..HEADER_WIDTH])?)?;
        debug!(len, "new message length");
        src.advance(HEADER_WIDTH);
        Ok(Some(len))
    }
}

impl Decoder for TextFrameCodec {
    type Item = String;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let len = match self.state {
            DecodeState::AccumulatingBody { len } => len,
            DecodeState::AwaitingHeader => match self.decode_header(src)? {
                Some(len) => {
                    self.state = DecodeState::AccumulatingBody { len };
                    len
                }
                None => return Ok(None),
            },
        };

        if src.len() < len {
            return Ok(None);
        }

        let body = src.split_to(len);
        self.state = DecodeState::AwaitingHeader;
        let message = String::from_utf8(body.to_vec())?;
        debug!(len, "full message received");
        Ok(Some(message))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(buf)? {
            Some(message) => Ok(Some(message)),
            None if buf.is_empty() && self.state == DecodeState::AwaitingHeader => Ok(None),
            None => Err(Error::Truncated {
                buffered: buf.len(),
            }),
        }
    }
}

impl<'a> Encoder<&'a str> for TextFrameCodec {
    type Error = Error;

    fn encode(&mut self, item: &'a str, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let len = self.check_length(item.len() as u64)?;

        // Reserve enough space for full encoding to avoid reallocating
        dst.reserve(HEADER_WIDTH + len);
        write_header(len, dst);
        dst.put_slice(item.as_bytes());
        Ok(())
    }
}

impl Encoder<String> for TextFrameCodec {
    type Error = Error;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<(), Self::Error> {
        Encoder::<&str>::encode(self, item.as_str(), dst)
    }
}

/// Encodes a single payload into a complete frame
pub fn encode(payload: &str) -> Result<Bytes, Error> {
    let mut dst = BytesMut::new();
    TextFrameCodec::new().encode(payload, &mut dst)?;
    Ok(dst.freeze())
}

/// Decodes exactly one complete frame
pub fn decode(frame: &[u8]) -> Result<String, Error> {
    let mut src = BytesMut::from(frame);
    let message = TextFrameCodec::new()
        .decode_eof(&mut src)?
        .ok_or(Error::Truncated { buffered: 0 })?;
    if !src.is_empty() {
        return Err(Error::TrailingBytes(src.len()));
    }
    Ok(message)
}
