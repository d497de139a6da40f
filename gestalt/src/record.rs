//! Every value in the binary format is built from records. A record is an eight byte unsigned
//! length in little endian byte order followed by exactly that many bytes of payload. Scalars are a
//! single record, containers are a count record followed by the records of their elements. There
//! is no magic number, no version and no checksum: a stream only makes sense to a reader that
//! names the same type structure the writer used.

use crate::error::{Error, Result};
use std::io::{ErrorKind, Read, Write};

/// Width of the length field in front of every payload
pub const LEN_WIDTH: usize = 8;

/// Writes a length field followed by the payload. Returns the number of written bytes.
pub fn write<W: Write>(payload: &[u8], w: &mut W) -> Result<usize> {
    let len = to_u64(payload.len())?;
    w.write_all(&len.to_le_bytes())?;
    w.write_all(payload)?;
    Ok(LEN_WIDTH + payload.len())
}

/// Reads a length field and then the whole payload it announces. The payload is read
/// incrementally so that a corrupt length can not trigger a huge allocation up front.
pub fn read<R: Read>(r: &mut R) -> Result<Vec<u8>> {
    let len = read_len(r)?;
    let mut payload = Vec::new();
    r.by_ref().take(len).read_to_end(&mut payload)?;
    if (payload.len() as u64) < len {
        return Err(Error::Eof(len));
    }
    Ok(payload)
}

/// Reads a record whose payload must be exactly as wide as `buf`.
pub fn read_exact<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<()> {
    let len = read_len(r)?;
    if len != buf.len() as u64 {
        return Err(Error::Width { declared: len, expected: buf.len() });
    }
    r.read_exact(buf).map_err(|e| eof(e, len))
}

fn read_len<R: Read>(r: &mut R) -> Result<u64> {
    let mut len = [0u8; LEN_WIDTH];
    r.read_exact(&mut len).map_err(|e| eof(e, LEN_WIDTH as u64))?;
    Ok(u64::from_le_bytes(len))
}

#[inline]
fn eof(e: std::io::Error, wanted: u64) -> Error {
    match e.kind() {
        ErrorKind::UnexpectedEof => Error::Eof(wanted),
        _ => Error::Io(e),
    }
}

#[inline]
pub fn to_usize(value: u64) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::Length(value))
}

#[inline]
pub fn to_u64(value: usize) -> Result<u64> {
    u64::try_from(value).map_err(|_| Error::custom(format!("Length {} exceeds maximum {}", value, u64::MAX)))
}
