//! `gestalt` turns statically typed Rust values into one of two encodings and back: a compact,
//! length prefixed binary format and a tree of nested elements written as XML. Which layout a value
//! gets depends only on its [Shape]: scalars, sequences, sets, mappings, pairs, tuples, and user
//! defined aggregates. Shapes nest without limit, so a `HashMap<String, Vec<(u8, Pair<f64, char>)>>`
//! needs no extra code.
//!
//! Both codecs follow the same recursion. Containers write their element count and hand every
//! element back to the encoder; scalars end the recursion. Decoding is driven by the target type:
//! the encoding itself carries no type information, so a value has to be decoded as the type it
//! was encoded from (or one with the same shape and compatible scalars).
//!
//! # The binary format
//!
//! Every scalar is one record: a 64 bit little endian length followed by the payload. Numbers are
//! stored in their little endian machine representation, text as UTF-8. Element counts and tuple
//! arities are records of their own.
//!
//! # The XML format
//!
//! Every value is an element below its parent, named by the caller. See the [xml] module for the
//! layout per shape. Documents can be stored as plain markup or wrapped in base64
//! [armor](armor::encode).
//!
//! # A note on `usize`
//!
//! Counts are stored as 64 bit integers. On architectures where `usize` is narrower, a count that
//! does not fit raises `Error::Length`.
//!
//! # Examples
//!
//! ```
//! use gestalt::*;
//!
//! let bytes = binary::to_bytes(&-456i32).unwrap();
//! assert_eq!(bytes, [
//!     0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // record of length 4
//!     0x38, 0xfe, 0xff, 0xff,                         // -456
//! ]);
//! assert_eq!(-456, binary::from_bytes::<i32>(&bytes).unwrap());
//!
//! let text = xml::to_string(&Pair::new(1u8, "one"), "std_pair").unwrap();
//! assert_eq!(text, "<serialization><std_pair><first val=\"1\"/><second val=\"one\"/></std_pair></serialization>");
//! let decoded: Pair<u8, String> = xml::from_str("std_pair", &text).unwrap();
//! assert_eq!(Pair::new(1, "one".to_string()), decoded);
//! ```

pub mod aggregate;
pub mod armor;
pub mod binary;
pub mod xml;

mod containers;
mod element;
mod error;
mod options;
mod parser;
mod record;
mod scalar;
mod shape;

pub use aggregate::{fragment, Aggregate};
pub use binary::{BinaryDecoder, BinaryEncoder};
pub use containers::Pair;
pub use element::Element;
pub use error::*;
pub use options::Options;
pub use shape::{Decode, Encode, Shape};
pub use xml::{XmlDecoder, XmlEncoder};

#[cfg(test)]
mod tests {
    use crate::{binary, xml, Decode, Encode, Options, Pair};
    use std::collections::{BTreeMap, BTreeSet, HashMap, LinkedList};
    use std::fmt::Debug;

    fn both_ways<T: Encode + Decode + PartialEq + Debug>(value: T) {
        assert_eq!(value, binary::from_bytes::<T>(&binary::to_bytes(&value).unwrap()).unwrap());
        assert_eq!(value, xml::from_str::<T>("value", &xml::to_string(&value, "value").unwrap()).unwrap());
        let armored = xml::to_armored_string(&value, "value", Options::default()).unwrap();
        assert_eq!(value, xml::from_armored_str::<T>("value", &armored, Options::default()).unwrap());
    }

    #[test]
    fn arithmetic() {
        both_ways(0xffu8);
        both_ways(-1i8);
        both_ways(0xffffu16);
        both_ways(-0x80i16);
        both_ways(123u32);
        both_ways(-456i32);
        both_ways(12300u64);
        both_ways(-45600i64);
        both_ways(123.456f32);
        both_ways(123.4567f64);
    }

    #[test]
    fn text() {
        both_ways("Hello World!".to_string());
        let raw: &str = "test 123";
        assert_eq!("test 123", binary::from_bytes::<String>(&binary::to_bytes(raw).unwrap()).unwrap());
        assert_eq!("test 123", xml::from_str::<String>("str", &xml::to_string(raw, "str").unwrap()).unwrap());
    }

    #[test]
    fn containers() {
        both_ways(vec![1, 2, 3, 4, 5]);
        both_ways((1..=4).collect::<LinkedList<i32>>());
        both_ways(BTreeMap::from([(1, 1), (2, 2), (3, 3)]));
        both_ways(HashMap::from([("a".to_string(), vec![1.5f64]), ("b".to_string(), vec![])]));
        both_ways(Pair::new(1, 2));
        both_ways((1, 2, 3));
        both_ways(vec![vec![1], vec![], vec![2, 3]]);
    }

    #[test]
    fn sets_collapse_duplicates() {
        let set: BTreeSet<i32> = [1, 2, 1].into_iter().collect();
        both_ways(set.clone());
        assert_eq!(2, set.len());
    }

    #[test]
    fn tuple_arity_is_checked_in_binary_only() {
        let bytes = binary::to_bytes(&(1, 2, 3)).unwrap();
        assert!(binary::from_bytes::<(i32, i32)>(&bytes).is_err());
        let text = xml::to_string(&(1, 2, 3), "t").unwrap();
        assert_eq!((1, 2), xml::from_str::<(i32, i32)>("t", &text).unwrap());
    }
}
