//! The bridge between user defined types and both codecs.
//!
//! An aggregate lowers itself into opaque fragments: a single byte fragment for the binary format
//! and an ordered list of text fragments, usually one per field, for the XML format. The fragments
//! are typically produced with this crate's own entry points, so fields of any supported shape
//! (other aggregates included) are available inside an aggregate.
//!
//! Implementing [Aggregate] is not enough to use a type with the codecs; the [aggregate!] macro
//! registers it and derives [Encode](crate::Encode) and [Decode](crate::Decode) with the
//! aggregate shape.
//!
//! ```
//! use gestalt::{aggregate, fragment, Aggregate, BinaryDecoder, Result};
//!
//! #[derive(Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Aggregate for Point {
//!     fn to_bytes(&self) -> Result<Vec<u8>> {
//!         let mut bytes = gestalt::binary::to_bytes(&self.x)?;
//!         bytes.extend(gestalt::binary::to_bytes(&self.y)?);
//!         Ok(bytes)
//!     }
//!
//!     fn from_bytes(bytes: &[u8]) -> Result<Self> {
//!         let mut decoder = BinaryDecoder::new(bytes);
//!         Ok(Point { x: decoder.decode()?, y: decoder.decode()? })
//!     }
//!
//!     fn to_fragments(&self) -> Result<Vec<String>> {
//!         Ok(vec![gestalt::xml::to_string(&self.x, "x")?, gestalt::xml::to_string(&self.y, "y")?])
//!     }
//!
//!     fn from_fragments(fragments: &[String]) -> Result<Self> {
//!         Ok(Point {
//!             x: gestalt::xml::from_str("x", fragment(fragments, 0)?)?,
//!             y: gestalt::xml::from_str("y", fragment(fragments, 1)?)?,
//!         })
//!     }
//! }
//!
//! aggregate!(Point);
//!
//! let points = vec![Point { x: 1, y: 2 }, Point { x: -3, y: 4 }];
//! let bytes = gestalt::binary::to_bytes(&points).unwrap();
//! assert_eq!(points, gestalt::binary::from_bytes::<Vec<Point>>(&bytes).unwrap());
//! let text = gestalt::xml::to_string(&points, "points").unwrap();
//! assert_eq!(points, gestalt::xml::from_str::<Vec<Point>>("points", &text).unwrap());
//! ```

use crate::binary::{BinaryDecoder, BinaryEncoder};
use crate::element::Element;
use crate::error::{Error, Result};
use crate::xml::{XmlDecoder, XmlEncoder};
use std::io::{Read, Write};

/// Name of the element that holds the fragments of an aggregate
pub const UDT: &str = "udt";

/// A user defined type that knows how to lower itself into fragments and how to rebuild itself from
/// them. The codecs never look inside a fragment: keeping the order and number of fragments
/// consistent between both directions is up to the implementation.
pub trait Aggregate: Sized {
    fn to_bytes(&self) -> Result<Vec<u8>>;

    fn from_bytes(bytes: &[u8]) -> Result<Self>;

    fn to_fragments(&self) -> Result<Vec<String>>;

    fn from_fragments(fragments: &[String]) -> Result<Self>;
}

/// Returns the fragment at `index`, or an error if the list is too short.
pub fn fragment(fragments: &[String], index: usize) -> Result<&str> {
    fragments
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| Error::custom(format!("Aggregate has {} fragments, no fragment {}", fragments.len(), index)))
}

pub fn encode_binary<T: Aggregate, W: Write>(value: &T, w: &mut BinaryEncoder<W>) -> Result<()> {
    w.write_record(&value.to_bytes()?)
}

pub fn decode_binary<T: Aggregate, R: Read>(r: &mut BinaryDecoder<R>) -> Result<T> {
    T::from_bytes(&r.read_record()?)
}

pub fn encode_xml<T: Aggregate>(value: &T, node: &mut Element, enc: &XmlEncoder) -> Result<()> {
    enc.encode(&value.to_fragments()?, UDT, node)
}

pub fn decode_xml<T: Aggregate>(node: &Element, dec: &XmlDecoder) -> Result<T> {
    let fragments: Vec<String> = dec.decode(UDT, node)?;
    T::from_fragments(&fragments)
}

/// Gives one or more types implementing [Aggregate] the aggregate shape.
#[macro_export]
macro_rules! aggregate {
    ($($t:ty),+ $(,)?) => { $(
        impl $crate::Encode for $t {
            const SHAPE: $crate::Shape = $crate::Shape::Aggregate;

            fn encode_binary<W: ::std::io::Write>(&self, w: &mut $crate::BinaryEncoder<W>) -> $crate::Result<()> {
                $crate::aggregate::encode_binary(self, w)
            }

            fn encode_xml(&self, node: &mut $crate::Element, enc: &$crate::XmlEncoder) -> $crate::Result<()> {
                $crate::aggregate::encode_xml(self, node, enc)
            }
        }

        impl $crate::Decode for $t {
            const SHAPE: $crate::Shape = $crate::Shape::Aggregate;

            fn decode_binary<R: ::std::io::Read>(r: &mut $crate::BinaryDecoder<R>) -> $crate::Result<Self> {
                $crate::aggregate::decode_binary(r)
            }

            fn decode_xml(node: &$crate::Element, dec: &$crate::XmlDecoder) -> $crate::Result<Self> {
                $crate::aggregate::decode_xml(node, dec)
            }
        }
    )+ };
}

#[cfg(test)]
mod tests {
    use super::{fragment, Aggregate};
    use crate::binary::{self, BinaryDecoder};
    use crate::error::{Error, ErrorKind, Result};
    use crate::xml;
    use crate::xml::XmlEncoder;
    use crate::{Decode, Element, Encode, Options, Shape};

    #[derive(Debug, Clone, PartialEq)]
    struct SimpleStruct {
        a: i32,
        b: i32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct UserDefinedType {
        idx: i32,
        name: String,
        data: Vec<f64>,
        simple: SimpleStruct,
    }

    impl Aggregate for SimpleStruct {
        fn to_bytes(&self) -> Result<Vec<u8>> {
            binary::to_bytes(&(self.a, self.b))
        }

        fn from_bytes(bytes: &[u8]) -> Result<Self> {
            let (a, b) = binary::from_bytes(bytes)?;
            Ok(SimpleStruct { a, b })
        }

        fn to_fragments(&self) -> Result<Vec<String>> {
            Ok(vec![xml::to_string(&self.a, "s.a")?, xml::to_string(&self.b, "s.b")?])
        }

        fn from_fragments(fragments: &[String]) -> Result<Self> {
            Ok(SimpleStruct {
                a: xml::from_str("s.a", fragment(fragments, 0)?)?,
                b: xml::from_str("s.b", fragment(fragments, 1)?)?,
            })
        }
    }

    impl Aggregate for UserDefinedType {
        fn to_bytes(&self) -> Result<Vec<u8>> {
            let mut bytes = Vec::new();
            bytes.extend(binary::to_bytes(&self.idx)?);
            bytes.extend(binary::to_bytes(&self.name)?);
            bytes.extend(binary::to_bytes(&self.data)?);
            bytes.extend(binary::to_bytes(&self.simple)?);
            Ok(bytes)
        }

        fn from_bytes(bytes: &[u8]) -> Result<Self> {
            let mut decoder = BinaryDecoder::new(bytes);
            Ok(UserDefinedType {
                idx: decoder.decode()?,
                name: decoder.decode()?,
                data: decoder.decode()?,
                simple: decoder.decode()?,
            })
        }

        fn to_fragments(&self) -> Result<Vec<String>> {
            Ok(vec![
                xml::to_string(&self.idx, "_0")?,
                xml::to_string(&self.name, "_1")?,
                xml::to_string(&self.data, "_2")?,
                xml::to_string(&self.simple, "_3")?,
            ])
        }

        fn from_fragments(fragments: &[String]) -> Result<Self> {
            Ok(UserDefinedType {
                idx: xml::from_str("_0", fragment(fragments, 0)?)?,
                name: xml::from_str("_1", fragment(fragments, 1)?)?,
                data: xml::from_str("_2", fragment(fragments, 2)?)?,
                simple: xml::from_str("_3", fragment(fragments, 3)?)?,
            })
        }
    }

    aggregate!(SimpleStruct, UserDefinedType);

    fn sample() -> UserDefinedType {
        UserDefinedType {
            idx: 1,
            name: "MyName".to_string(),
            data: vec![4.1, 5.2, 6.3],
            simple: SimpleStruct { a: 1, b: 2 },
        }
    }

    #[test]
    fn shape() {
        assert_eq!(Shape::Aggregate, <UserDefinedType as Encode>::SHAPE);
        assert_eq!(Shape::Aggregate, <SimpleStruct as Decode>::SHAPE);
    }

    #[test]
    fn binary_is_one_record() {
        let simple = SimpleStruct { a: 1, b: 2 };
        let fragment = simple.to_bytes().unwrap();
        let bytes = binary::to_bytes(&simple).unwrap();
        assert_eq!(fragment.len() as u64, u64::from_le_bytes(bytes[..8].try_into().unwrap()));
        assert_eq!(&fragment[..], &bytes[8..]);
    }

    #[test]
    fn binary_roundtrip() {
        let udt = sample();
        assert_eq!(udt, binary::from_bytes::<UserDefinedType>(&binary::to_bytes(&udt).unwrap()).unwrap());
        let many = vec![udt.clone(), udt];
        assert_eq!(many, binary::from_bytes::<Vec<UserDefinedType>>(&binary::to_bytes(&many).unwrap()).unwrap());
    }

    #[test]
    fn xml_layout() {
        let text = xml::to_string(&SimpleStruct { a: 1, b: 2 }, "simple").unwrap();
        let root = xml::parse_document(&text).unwrap();
        let udt = root.child("simple").unwrap().child("udt").unwrap();
        assert_eq!(Some("2"), udt.attribute("size"));
        assert_eq!(
            Some("<serialization><s.a val=\"1\"/></serialization>"),
            udt.child("_0").unwrap().attribute("val")
        );
    }

    #[test]
    fn armored_roundtrip() {
        let udt = sample();
        let options = Options::default();
        let armored = xml::to_armored_string(&udt, "udt", options).unwrap();
        assert_eq!(udt, xml::from_armored_str::<UserDefinedType>("udt", &armored, options).unwrap());
    }

    #[test]
    fn files() {
        let dir = tempfile::tempdir().unwrap();
        let udt = sample();
        binary::save(&udt, dir.path().join("udt.bin")).unwrap();
        assert_eq!(udt, binary::load::<UserDefinedType, _>(dir.path().join("udt.bin")).unwrap());
        xml::save_armored(&udt, "udt", dir.path().join("udt.xml.b64")).unwrap();
        assert_eq!(udt, xml::load_armored::<UserDefinedType, _>("udt", dir.path().join("udt.xml.b64")).unwrap());
    }

    #[test]
    fn missing_fragment() {
        let mut root = Element::new(xml::ROOT);
        let mut simple = Element::new("simple");
        let fragments = vec![xml::to_string(&1, "s.a").unwrap()];
        XmlEncoder::new().encode(&fragments, "udt", &mut simple).unwrap();
        root.push(simple);
        let e = xml::from_element::<SimpleStruct>(&root, "simple").unwrap_err();
        assert!(matches!(e, Error::Message(_)));
        assert_eq!(ErrorKind::Format, e.kind());
    }
}
