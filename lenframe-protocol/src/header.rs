/// Fixed-width length header
use crate::{util::ResultExt, Error};
use std::fmt::Write;
use tokio_util::bytes::BytesMut;

/// Number of bytes reserved for the decimal length field
pub const HEADER_WIDTH: usize = 10;

/// Largest payload length that fits in `HEADER_WIDTH` decimal digits
pub const MAX_PAYLOAD_LEN: u64 = 9_999_999_999;

/// Appends the header for a payload of `len` bytes. Caller checks `len`
/// against `MAX_PAYLOAD_LEN`.
pub(crate) fn write_header(len: usize, dst: &mut BytesMut) {
    write!(dst, "{:<width$}", len, width = HEADER_WIDTH).expect("infallible");
}

/// Parses a complete `HEADER_WIDTH`-byte header field into the declared
/// payload length.
pub(crate) fn parse_header(raw: &[u8]) -> Result<u64, Error> {
    let digits = std::str::from_utf8(raw)
        .or_invalid_header(raw)?
        .trim_matches(|c: char| c.is_ascii_whitespace());
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidHeader(digits.into()));
    }
    digits.parse().or_invalid_header(raw)
}
