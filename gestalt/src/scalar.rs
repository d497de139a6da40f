//! Scalars are the leaves of every encoding. In the binary format a scalar is a single record with
//! its little endian representation, in the XML format it is an element with a single `val`
//! attribute.
//!
//! Integers are written in their shortest exact decimal form. Floating point numbers use the
//! shortest decimal that parses back to the identical value, so the text format round-trips them
//! exactly. `bool` is written as `1` or `0` and `char` as its decimal code point, which keeps
//! control characters out of the markup.

use crate::binary::{BinaryDecoder, BinaryEncoder};
use crate::element::Element;
use crate::error::{Error, Result};
use crate::shape::{Decode, Encode, Shape};
use crate::xml::{XmlDecoder, XmlEncoder};
use std::borrow::Cow;
use std::io::{Read, Write};
use std::mem::size_of;
use std::str::FromStr;

pub(crate) const VAL: &str = "val";

fn parse<T: FromStr>(node: &Element, target: &'static str) -> Result<T> {
    let text = node.require_attribute(VAL)?;
    text.parse().map_err(|_| Error::Number(text.to_owned(), target))
}

macro_rules! number {
    ($($t:ty),* $(,)?) => { $(
        impl Encode for $t {
            const SHAPE: Shape = Shape::Scalar;

            fn encode_binary<W: Write>(&self, w: &mut BinaryEncoder<W>) -> Result<()> {
                w.write_record(&self.to_le_bytes())
            }

            fn encode_xml(&self, node: &mut Element, _enc: &XmlEncoder) -> Result<()> {
                node.set_attribute(VAL, self.to_string());
                Ok(())
            }
        }

        impl Decode for $t {
            const SHAPE: Shape = Shape::Scalar;

            fn decode_binary<R: Read>(r: &mut BinaryDecoder<R>) -> Result<Self> {
                let mut buf = [0u8; size_of::<$t>()];
                r.read_fixed(&mut buf)?;
                Ok(<$t>::from_le_bytes(buf))
            }

            fn decode_xml(node: &Element, _dec: &XmlDecoder) -> Result<Self> {
                parse(node, stringify!($t))
            }
        }
    )* }
}

number!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

impl Encode for bool {
    const SHAPE: Shape = Shape::Scalar;

    fn encode_binary<W: Write>(&self, w: &mut BinaryEncoder<W>) -> Result<()> {
        w.write_record(&[*self as u8])
    }

    fn encode_xml(&self, node: &mut Element, _enc: &XmlEncoder) -> Result<()> {
        node.set_attribute(VAL, if *self { "1" } else { "0" });
        Ok(())
    }
}

impl Decode for bool {
    const SHAPE: Shape = Shape::Scalar;

    fn decode_binary<R: Read>(r: &mut BinaryDecoder<R>) -> Result<Self> {
        let mut buf = [0u8; 1];
        r.read_fixed(&mut buf)?;
        match buf[0] {
            0 => Ok(false),
            1 => Ok(true),
            x => Err(Error::Number(x.to_string(), "bool")),
        }
    }

    fn decode_xml(node: &Element, _dec: &XmlDecoder) -> Result<Self> {
        match node.require_attribute(VAL)? {
            "1" | "true"  => Ok(true),
            "0" | "false" => Ok(false),
            x             => Err(Error::Number(x.to_owned(), "bool")),
        }
    }
}

impl Encode for char {
    const SHAPE: Shape = Shape::Scalar;

    fn encode_binary<W: Write>(&self, w: &mut BinaryEncoder<W>) -> Result<()> {
        w.write_record(&u32::from(*self).to_le_bytes())
    }

    fn encode_xml(&self, node: &mut Element, _enc: &XmlEncoder) -> Result<()> {
        node.set_attribute(VAL, u32::from(*self).to_string());
        Ok(())
    }
}

impl Decode for char {
    const SHAPE: Shape = Shape::Scalar;

    fn decode_binary<R: Read>(r: &mut BinaryDecoder<R>) -> Result<Self> {
        let mut buf = [0u8; 4];
        r.read_fixed(&mut buf)?;
        let code = u32::from_le_bytes(buf);
        char::from_u32(code).ok_or_else(|| Error::Number(code.to_string(), "char"))
    }

    fn decode_xml(node: &Element, _dec: &XmlDecoder) -> Result<Self> {
        let code: u32 = parse(node, "char")?;
        char::from_u32(code).ok_or_else(|| Error::Number(code.to_string(), "char"))
    }
}

impl Encode for str {
    const SHAPE: Shape = Shape::Scalar;

    fn encode_binary<W: Write>(&self, w: &mut BinaryEncoder<W>) -> Result<()> {
        w.write_record(self.as_bytes())
    }

    fn encode_xml(&self, node: &mut Element, _enc: &XmlEncoder) -> Result<()> {
        node.set_attribute(VAL, self);
        Ok(())
    }
}

impl Decode for String {
    const SHAPE: Shape = Shape::Scalar;

    fn decode_binary<R: Read>(r: &mut BinaryDecoder<R>) -> Result<Self> {
        Ok(String::from_utf8(r.read_record()?)?)
    }

    fn decode_xml(node: &Element, _dec: &XmlDecoder) -> Result<Self> {
        Ok(node.require_attribute(VAL)?.to_owned())
    }
}

macro_rules! text {
    ($($t:ty),* $(,)?) => { $(
        impl Encode for $t {
            const SHAPE: Shape = Shape::Scalar;

            fn encode_binary<W: Write>(&self, w: &mut BinaryEncoder<W>) -> Result<()> {
                <str as Encode>::encode_binary(self, w)
            }

            fn encode_xml(&self, node: &mut Element, enc: &XmlEncoder) -> Result<()> {
                <str as Encode>::encode_xml(self, node, enc)
            }
        }
    )* }
}

text!(String, Box<str>, Cow<'_, str>);

impl Decode for Box<str> {
    const SHAPE: Shape = Shape::Scalar;

    fn decode_binary<R: Read>(r: &mut BinaryDecoder<R>) -> Result<Self> {
        String::decode_binary(r).map(String::into_boxed_str)
    }

    fn decode_xml(node: &Element, dec: &XmlDecoder) -> Result<Self> {
        String::decode_xml(node, dec).map(String::into_boxed_str)
    }
}

impl<'a> Decode for Cow<'a, str> {
    const SHAPE: Shape = Shape::Scalar;

    fn decode_binary<R: Read>(r: &mut BinaryDecoder<R>) -> Result<Self> {
        String::decode_binary(r).map(Cow::Owned)
    }

    fn decode_xml(node: &Element, dec: &XmlDecoder) -> Result<Self> {
        String::decode_xml(node, dec).map(Cow::Owned)
    }
}
