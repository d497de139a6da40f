//! Every type that can be encoded belongs to exactly one [Shape]. The shape decides how the value
//! is laid out in both wire formats: the binary codec writes records, the XML codec writes nested
//! elements, but both follow the same recursion per shape.
//!
//! Classification happens at compile time. Each supported type implements [Encode] and [Decode]
//! once, which fixes its shape through the associated `SHAPE` constant. A type that has no
//! implementation is rejected by the compiler wherever it is handed to a codec; there is no
//! fallback and no runtime inspection.
//!
//! Shapes overlap structurally, so the implementations respect an order of precedence: scalars
//! are recognized before containers (a `String` is text, never a sequence of characters, and a
//! `str` reference is text as well), and pairs before tuples (only [Pair](crate::Pair) is a pair;
//! Rust tuples, two element ones included, are tuples).

use crate::binary::{BinaryDecoder, BinaryEncoder};
use crate::element::Element;
use crate::error::Result;
use crate::xml::{XmlDecoder, XmlEncoder};
use std::io::{Read, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Booleans, characters, numbers and text
    Scalar,
    /// An ordered, resizable collection
    Sequence,
    /// An unordered collection of unique elements
    Set,
    /// Unique keys, each associated with one value
    Mapping,
    /// Exactly two fields named `first` and `second`
    Pair,
    /// A fixed number of heterogeneous fields
    Tuple,
    /// A user defined type which lowers itself into fragments
    Aggregate,
}

impl Shape {

    /// Returns the name of the shape. This is useful for log messages.
    pub fn name(&self) -> &'static str {
        match *self {
            Shape::Scalar    => "scalar",
            Shape::Sequence  => "sequence",
            Shape::Set       => "set",
            Shape::Mapping   => "mapping",
            Shape::Pair      => "pair",
            Shape::Tuple     => "tuple",
            Shape::Aggregate => "aggregate",
        }
    }

}

/// Types that can be written into either wire format.
pub trait Encode {
    const SHAPE: Shape;

    /// Writes the records of `self` into the encoder. Nested values should go through
    /// [BinaryEncoder::encode] rather than calling this directly.
    fn encode_binary<W: Write>(&self, w: &mut BinaryEncoder<W>) -> Result<()>;

    /// Fills the element that represents `self`. The element has already been created and named
    /// by the caller; nested values should go through [XmlEncoder::encode].
    fn encode_xml(&self, node: &mut Element, enc: &XmlEncoder) -> Result<()>;
}

/// Types that can be reconstructed from either wire format.
pub trait Decode: Sized {
    const SHAPE: Shape;

    fn decode_binary<R: Read>(r: &mut BinaryDecoder<R>) -> Result<Self>;

    /// Reconstructs a value from the element that represents it.
    fn decode_xml(node: &Element, dec: &XmlDecoder) -> Result<Self>;
}

impl<'a, T: Encode + ?Sized> Encode for &'a T {
    const SHAPE: Shape = T::SHAPE;

    #[inline]
    fn encode_binary<W: Write>(&self, w: &mut BinaryEncoder<W>) -> Result<()> {
        (**self).encode_binary(w)
    }

    #[inline]
    fn encode_xml(&self, node: &mut Element, enc: &XmlEncoder) -> Result<()> {
        (**self).encode_xml(node, enc)
    }
}

#[cfg(test)]
mod tests {
    use super::{Decode, Encode, Shape};
    use crate::Pair;
    use std::borrow::Cow;
    use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};

    fn shape_of<T: Encode + ?Sized>(_: &T) -> Shape {
        T::SHAPE
    }

    #[test]
    fn scalars_before_containers() {
        assert_eq!(Shape::Scalar, <String as Encode>::SHAPE);
        assert_eq!(Shape::Scalar, shape_of("raw text"));
        assert_eq!(Shape::Scalar, shape_of(&"raw text"));
        assert_eq!(Shape::Scalar, <Cow<'static, str> as Decode>::SHAPE);
        assert_eq!(Shape::Scalar, <Box<str> as Decode>::SHAPE);
        assert_eq!(Shape::Scalar, <char as Decode>::SHAPE);
        assert_eq!(Shape::Scalar, <u128 as Decode>::SHAPE);
        assert_eq!(Shape::Sequence, <Vec<char> as Decode>::SHAPE);
    }

    #[test]
    fn pairs_before_tuples() {
        assert_eq!(Shape::Pair, <Pair<i32, i32> as Decode>::SHAPE);
        assert_eq!(Shape::Tuple, <(i32, i32) as Decode>::SHAPE);
        assert_eq!(Shape::Tuple, <(i32,) as Decode>::SHAPE);
        assert_eq!(Shape::Tuple, <(u8, String, f64) as Decode>::SHAPE);
    }

    #[test]
    fn containers() {
        assert_eq!(Shape::Sequence, <VecDeque<u8> as Decode>::SHAPE);
        assert_eq!(Shape::Sequence, <LinkedList<u8> as Decode>::SHAPE);
        assert_eq!(Shape::Set, <BTreeSet<u8> as Decode>::SHAPE);
        assert_eq!(Shape::Set, <HashSet<u8> as Decode>::SHAPE);
        assert_eq!(Shape::Mapping, <BTreeMap<u8, String> as Decode>::SHAPE);
        assert_eq!(Shape::Mapping, <HashMap<u8, String> as Decode>::SHAPE);
        assert_eq!("mapping", Shape::Mapping.name());
    }
}
