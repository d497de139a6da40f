//! The length prefixed binary format. See the [record](crate::record) module for the framing.
//!
//! Per shape, values are laid out as follows:
//!
//! * scalar: one record holding the little endian bytes of the value, or the UTF-8 bytes of text
//! * sequence and set: a count record, then every element in iteration order
//! * mapping: a count record, then key and value of every entry
//! * pair: `first`, then `second`, no count
//! * tuple: an arity record, then every field in declaration order. Decoding checks the arity.
//! * aggregate: one record holding the fragment the aggregate lowered itself to

use crate::error::{Error, Result};
use crate::options::Options;
use crate::record;
use crate::shape::{Decode, Encode};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// Upper bound for pre-allocating containers from an untrusted count
const PRESIZE_LIMIT: usize = 4096;

/// Used to encode values into any writer.
pub struct BinaryEncoder<W> {
    writer: W,
    options: Options,
}

impl<W: Write> BinaryEncoder<W> {

    pub fn new(writer: W) -> Self {
        Self::with_options(writer, Options::default())
    }

    pub fn with_options(writer: W, options: Options) -> Self {
        Self { writer, options }
    }

    /// Dispatches on the shape of `T` and writes the value.
    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        if self.options.is_tracing() {
            debug!(shape = T::SHAPE.name(), ty = std::any::type_name::<T>(), "binary encode");
        }
        value.encode_binary(self)
    }

    /// Writes a raw record. This is what scalars and aggregate fragments end up as.
    pub fn write_record(&mut self, payload: &[u8]) -> Result<()> {
        record::write(payload, &mut self.writer).map(|_| ())
    }

    /// Writes an element count or a tuple arity.
    pub fn write_count(&mut self, count: usize) -> Result<()> {
        self.write_record(&record::to_u64(count)?.to_le_bytes())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

}

/// Used to decode values from any reader.
pub struct BinaryDecoder<R> {
    reader: R,
    options: Options,
}

impl<R: Read> BinaryDecoder<R> {

    pub fn new(reader: R) -> Self {
        Self::with_options(reader, Options::default())
    }

    pub fn with_options(reader: R, options: Options) -> Self {
        Self { reader, options }
    }

    /// Dispatches on the shape of `T` and reads a value.
    pub fn decode<T: Decode>(&mut self) -> Result<T> {
        if self.options.is_tracing() {
            debug!(shape = T::SHAPE.name(), ty = std::any::type_name::<T>(), "binary decode");
        }
        T::decode_binary(self)
    }

    /// Reads a raw record of any length.
    pub fn read_record(&mut self) -> Result<Vec<u8>> {
        record::read(&mut self.reader)
    }

    /// Reads a record that must be exactly as wide as `buf`.
    pub fn read_fixed(&mut self, buf: &mut [u8]) -> Result<()> {
        record::read_exact(&mut self.reader, buf)
    }

    /// Reads an element count.
    pub fn read_count(&mut self) -> Result<usize> {
        record::to_usize(self.read_raw_count()?)
    }

    /// Reads a tuple arity and checks it against the arity of the target type.
    pub fn expect_arity(&mut self, expected: usize) -> Result<()> {
        let found = self.read_raw_count()?;
        if found != expected as u64 {
            return Err(Error::Arity { expected, found });
        }
        Ok(())
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn read_raw_count(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.read_fixed(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

}

/// Capacity to reserve for a container announcing `count` elements.
pub(crate) fn presize(count: usize) -> usize {
    count.min(PRESIZE_LIMIT)
}

pub fn to_writer<T: Encode + ?Sized, W: Write>(value: &T, writer: W) -> Result<()> {
    BinaryEncoder::new(writer).encode(value)
}

pub fn to_bytes<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut encoder = BinaryEncoder::new(Vec::new());
    encoder.encode(value)?;
    Ok(encoder.into_inner())
}

/// Decodes a single value from the reader. The reader may hold more data afterwards.
pub fn from_reader<T: Decode, R: Read>(reader: R) -> Result<T> {
    BinaryDecoder::new(reader).decode()
}

/// Decodes a single value which must span the whole buffer.
pub fn from_bytes<T: Decode>(bytes: &[u8]) -> Result<T> {
    let mut decoder = BinaryDecoder::new(bytes);
    let value = decoder.decode()?;
    finish(decoder, value)
}

/// Encodes the value into a freshly created file. A failed call may leave a truncated file behind.
pub fn save<T: Encode + ?Sized, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    save_with_options(value, path, Options::default())
}

pub fn save_with_options<T: Encode + ?Sized, P: AsRef<Path>>(value: &T, path: P, options: Options) -> Result<()> {
    write_file(path.as_ref(), options, |encoder| encoder.encode(value))
}

pub fn load<T: Decode, P: AsRef<Path>>(path: P) -> Result<T> {
    load_with_options(path, Options::default())
}

pub fn load_with_options<T: Decode, P: AsRef<Path>>(path: P, options: Options) -> Result<T> {
    let bytes = read_file(path.as_ref(), options)?;
    let mut decoder = BinaryDecoder::with_options(&bytes[..], options);
    let value = decoder.decode()?;
    finish(decoder, value)
}

/// Encodes a value of any type through a caller supplied lowering. The closure turns the value
/// into an opaque fragment which is stored the same way an aggregate's fragment is.
pub fn to_bytes_with<T: ?Sized, F>(value: &T, lower: F) -> Result<Vec<u8>>
where
    F: FnOnce(&T) -> Result<Vec<u8>>,
{
    let mut encoder = BinaryEncoder::new(Vec::new());
    encoder.write_record(&lower(value)?)?;
    Ok(encoder.into_inner())
}

/// Counterpart of [to_bytes_with]: the closure rebuilds the value from its fragment.
pub fn from_bytes_with<T, F>(bytes: &[u8], raise: F) -> Result<T>
where
    F: FnOnce(&[u8]) -> Result<T>,
{
    let mut decoder = BinaryDecoder::new(bytes);
    let fragment = decoder.read_record()?;
    let value = raise(&fragment)?;
    finish(decoder, value)
}

pub fn save_with<T: ?Sized, P, F>(value: &T, path: P, lower: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&T) -> Result<Vec<u8>>,
{
    write_file(path.as_ref(), Options::default(), |encoder| encoder.write_record(&lower(value)?))
}

pub fn load_with<T, P, F>(path: P, raise: F) -> Result<T>
where
    P: AsRef<Path>,
    F: FnOnce(&[u8]) -> Result<T>,
{
    from_bytes_with(&read_file(path.as_ref(), Options::default())?, raise)
}

fn finish<T>(decoder: BinaryDecoder<&[u8]>, value: T) -> Result<T> {
    match decoder.into_inner().len() {
        0 => Ok(value),
        n => Err(Error::Trailing(n)),
    }
}

fn write_file<F>(path: &Path, options: Options, f: F) -> Result<()>
where
    F: FnOnce(&mut BinaryEncoder<BufWriter<File>>) -> Result<()>,
{
    if options.is_tracing() {
        debug!(path = %path.display(), "binary save");
    }
    let file = File::create(path).map_err(|e| Error::File(path.to_owned(), e))?;
    let mut encoder = BinaryEncoder::with_options(BufWriter::new(file), options);
    f(&mut encoder)?;
    encoder.into_inner().flush()?;
    Ok(())
}

fn read_file(path: &Path, options: Options) -> Result<Vec<u8>> {
    if options.is_tracing() {
        debug!(path = %path.display(), "binary load");
    }
    std::fs::read(path).map_err(|e| Error::File(path.to_owned(), e))
}
