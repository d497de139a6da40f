//! Sequences, sets, mappings, pairs and tuples. Containers never encode anything themselves
//! beyond their count; every element goes back through the encoder so that nesting is unlimited.

use crate::binary::{presize, BinaryDecoder, BinaryEncoder};
use crate::element::Element;
use crate::error::Result;
use crate::shape::{Decode, Encode, Shape};
use crate::xml::{self, XmlDecoder, XmlEncoder};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::io::{Read, Write};

/// Two values, stored under the names `first` and `second`. This is the only type with the pair
/// shape: Rust tuples of two are tuples and carry an arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pair<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> Pair<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A, B> From<(A, B)> for Pair<A, B> {
    fn from((first, second): (A, B)) -> Self {
        Self { first, second }
    }
}

impl<A, B> From<Pair<A, B>> for (A, B) {
    fn from(pair: Pair<A, B>) -> Self {
        (pair.first, pair.second)
    }
}

const FIRST: &str = "first";
const SECOND: &str = "second";

fn write_items<'a, T, I, W>(items: I, w: &mut BinaryEncoder<W>) -> Result<()>
where
    T: Encode + 'a,
    I: ExactSizeIterator<Item = &'a T>,
    W: Write,
{
    w.write_count(items.len())?;
    for item in items {
        w.encode(item)?;
    }
    Ok(())
}

fn read_items<T, C, R, F>(r: &mut BinaryDecoder<R>, new: F) -> Result<C>
where
    T: Decode,
    C: Extend<T>,
    R: Read,
    F: FnOnce(usize) -> C,
{
    let count = r.read_count()?;
    let mut items = new(presize(count));
    for _ in 0..count {
        items.extend(Some(r.decode()?));
    }
    Ok(items)
}

fn write_children<'a, T, I>(items: I, node: &mut Element, enc: &XmlEncoder) -> Result<()>
where
    T: Encode + 'a,
    I: ExactSizeIterator<Item = &'a T>,
{
    enc.write_size(node, items.len());
    for (i, item) in items.enumerate() {
        enc.encode(item, &xml::index(i), node)?;
    }
    Ok(())
}

fn read_children<T, C, F>(node: &Element, dec: &XmlDecoder, new: F) -> Result<C>
where
    T: Decode,
    C: Extend<T>,
    F: FnOnce(usize) -> C,
{
    let count = dec.read_size(node)?;
    let mut items = new(presize(count));
    for i in 0..count {
        items.extend(Some(dec.decode_near(&xml::index(i), i, node)?));
    }
    Ok(items)
}

fn write_entries<'a, K, V, I, W>(entries: I, w: &mut BinaryEncoder<W>) -> Result<()>
where
    K: Encode + 'a,
    V: Encode + 'a,
    I: ExactSizeIterator<Item = (&'a K, &'a V)>,
    W: Write,
{
    w.write_count(entries.len())?;
    for (k, v) in entries {
        w.encode(k)?;
        w.encode(v)?;
    }
    Ok(())
}

fn read_entries<K, V, C, R, F>(r: &mut BinaryDecoder<R>, new: F) -> Result<C>
where
    K: Decode,
    V: Decode,
    C: Extend<(K, V)>,
    R: Read,
    F: FnOnce(usize) -> C,
{
    let count = r.read_count()?;
    let mut entries = new(presize(count));
    for _ in 0..count {
        let k = r.decode()?;
        let v = r.decode()?;
        entries.extend(Some((k, v)));
    }
    Ok(entries)
}

fn write_entry_children<'a, K, V, I>(entries: I, node: &mut Element, enc: &XmlEncoder) -> Result<()>
where
    K: Encode + 'a,
    V: Encode + 'a,
    I: ExactSizeIterator<Item = (&'a K, &'a V)>,
{
    enc.write_size(node, entries.len());
    for (i, (k, v)) in entries.enumerate() {
        enc.encode(k, &xml::key(i), node)?;
        enc.encode(v, &xml::value(i), node)?;
    }
    Ok(())
}

fn read_entry_children<K, V, C, F>(node: &Element, dec: &XmlDecoder, new: F) -> Result<C>
where
    K: Decode,
    V: Decode,
    C: Extend<(K, V)>,
    F: FnOnce(usize) -> C,
{
    let count = dec.read_size(node)?;
    let mut entries = new(presize(count));
    for i in 0..count {
        let k = dec.decode_near(&xml::key(i), 2 * i, node)?;
        let v = dec.decode_near(&xml::value(i), 2 * i + 1, node)?;
        entries.extend(Some((k, v)));
    }
    Ok(entries)
}

macro_rules! collection {
    ($shape:ident, $t:ident <T $(: $bound:ident $(+ $more:ident)*)?>, $new:expr) => {
        impl<T: Encode> Encode for $t<T> {
            const SHAPE: Shape = Shape::$shape;

            fn encode_binary<W: Write>(&self, w: &mut BinaryEncoder<W>) -> Result<()> {
                write_items(self.iter(), w)
            }

            fn encode_xml(&self, node: &mut Element, enc: &XmlEncoder) -> Result<()> {
                write_children(self.iter(), node, enc)
            }
        }

        impl<T: Decode $(+ $bound $(+ $more)*)?> Decode for $t<T> {
            const SHAPE: Shape = Shape::$shape;

            fn decode_binary<R: Read>(r: &mut BinaryDecoder<R>) -> Result<Self> {
                read_items::<T, _, _, _>(r, $new)
            }

            fn decode_xml(node: &Element, dec: &XmlDecoder) -> Result<Self> {
                read_children::<T, _, _>(node, dec, $new)
            }
        }
    };
}

collection!(Sequence, Vec<T>, Vec::with_capacity);
collection!(Sequence, VecDeque<T>, VecDeque::with_capacity);
collection!(Sequence, LinkedList<T>, |_| LinkedList::new());
collection!(Set, BTreeSet<T: Ord>, |_| BTreeSet::new());

impl<T: Encode, S> Encode for HashSet<T, S> {
    const SHAPE: Shape = Shape::Set;

    fn encode_binary<W: Write>(&self, w: &mut BinaryEncoder<W>) -> Result<()> {
        write_items(self.iter(), w)
    }

    fn encode_xml(&self, node: &mut Element, enc: &XmlEncoder) -> Result<()> {
        write_children(self.iter(), node, enc)
    }
}

impl<T, S> Decode for HashSet<T, S>
where
    T: Decode + Eq + Hash,
    S: BuildHasher + Default,
{
    const SHAPE: Shape = Shape::Set;

    fn decode_binary<R: Read>(r: &mut BinaryDecoder<R>) -> Result<Self> {
        read_items::<T, _, _, _>(r, |n| HashSet::with_capacity_and_hasher(n, S::default()))
    }

    fn decode_xml(node: &Element, dec: &XmlDecoder) -> Result<Self> {
        read_children::<T, _, _>(node, dec, |n| HashSet::with_capacity_and_hasher(n, S::default()))
    }
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    const SHAPE: Shape = Shape::Mapping;

    fn encode_binary<W: Write>(&self, w: &mut BinaryEncoder<W>) -> Result<()> {
        write_entries(self.iter(), w)
    }

    fn encode_xml(&self, node: &mut Element, enc: &XmlEncoder) -> Result<()> {
        write_entry_children(self.iter(), node, enc)
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    const SHAPE: Shape = Shape::Mapping;

    fn decode_binary<R: Read>(r: &mut BinaryDecoder<R>) -> Result<Self> {
        read_entries::<K, V, _, _, _>(r, |_| BTreeMap::new())
    }

    fn decode_xml(node: &Element, dec: &XmlDecoder) -> Result<Self> {
        read_entry_children::<K, V, _, _>(node, dec, |_| BTreeMap::new())
    }
}

impl<K: Encode, V: Encode, S> Encode for HashMap<K, V, S> {
    const SHAPE: Shape = Shape::Mapping;

    fn encode_binary<W: Write>(&self, w: &mut BinaryEncoder<W>) -> Result<()> {
        write_entries(self.iter(), w)
    }

    fn encode_xml(&self, node: &mut Element, enc: &XmlEncoder) -> Result<()> {
        write_entry_children(self.iter(), node, enc)
    }
}

impl<K, V, S> Decode for HashMap<K, V, S>
where
    K: Decode + Eq + Hash,
    V: Decode,
    S: BuildHasher + Default,
{
    const SHAPE: Shape = Shape::Mapping;

    fn decode_binary<R: Read>(r: &mut BinaryDecoder<R>) -> Result<Self> {
        read_entries::<K, V, _, _, _>(r, |n| HashMap::with_capacity_and_hasher(n, S::default()))
    }

    fn decode_xml(node: &Element, dec: &XmlDecoder) -> Result<Self> {
        read_entry_children::<K, V, _, _>(node, dec, |n| HashMap::with_capacity_and_hasher(n, S::default()))
    }
}

impl<A: Encode, B: Encode> Encode for Pair<A, B> {
    const SHAPE: Shape = Shape::Pair;

    fn encode_binary<W: Write>(&self, w: &mut BinaryEncoder<W>) -> Result<()> {
        w.encode(&self.first)?;
        w.encode(&self.second)
    }

    fn encode_xml(&self, node: &mut Element, enc: &XmlEncoder) -> Result<()> {
        enc.encode(&self.first, FIRST, node)?;
        enc.encode(&self.second, SECOND, node)
    }
}

impl<A: Decode, B: Decode> Decode for Pair<A, B> {
    const SHAPE: Shape = Shape::Pair;

    fn decode_binary<R: Read>(r: &mut BinaryDecoder<R>) -> Result<Self> {
        let first = r.decode()?;
        let second = r.decode()?;
        Ok(Self { first, second })
    }

    fn decode_xml(node: &Element, dec: &XmlDecoder) -> Result<Self> {
        let first = dec.decode_near(FIRST, 0, node)?;
        let second = dec.decode_near(SECOND, 1, node)?;
        Ok(Self { first, second })
    }
}

macro_rules! tuple {
    ($arity:expr => $($idx:tt $t:ident),+) => {
        impl<$($t: Encode),+> Encode for ($($t,)+) {
            const SHAPE: Shape = Shape::Tuple;

            fn encode_binary<W: Write>(&self, w: &mut BinaryEncoder<W>) -> Result<()> {
                w.write_count($arity)?;
                $( w.encode(&self.$idx)?; )+
                Ok(())
            }

            fn encode_xml(&self, node: &mut Element, enc: &XmlEncoder) -> Result<()> {
                $( enc.encode(&self.$idx, concat!("_", stringify!($idx)), node)?; )+
                Ok(())
            }
        }

        impl<$($t: Decode),+> Decode for ($($t,)+) {
            const SHAPE: Shape = Shape::Tuple;

            fn decode_binary<R: Read>(r: &mut BinaryDecoder<R>) -> Result<Self> {
                r.expect_arity($arity)?;
                Ok(($( r.decode::<$t>()?, )+))
            }

            fn decode_xml(node: &Element, dec: &XmlDecoder) -> Result<Self> {
                Ok(($( dec.decode_near::<$t>(concat!("_", stringify!($idx)), $idx, node)?, )+))
            }
        }
    };
}

tuple!(1 => 0 T0);
tuple!(2 => 0 T0, 1 T1);
tuple!(3 => 0 T0, 1 T1, 2 T2);
tuple!(4 => 0 T0, 1 T1, 2 T2, 3 T3);
tuple!(5 => 0 T0, 1 T1, 2 T2, 3 T3, 4 T4);
tuple!(6 => 0 T0, 1 T1, 2 T2, 3 T3, 4 T4, 5 T5);
tuple!(7 => 0 T0, 1 T1, 2 T2, 3 T3, 4 T4, 5 T5, 6 T6);
tuple!(8 => 0 T0, 1 T1, 2 T2, 3 T3, 4 T4, 5 T5, 6 T6, 7 T7);
tuple!(9 => 0 T0, 1 T1, 2 T2, 3 T3, 4 T4, 5 T5, 6 T6, 7 T7, 8 T8);
tuple!(10 => 0 T0, 1 T1, 2 T2, 3 T3, 4 T4, 5 T5, 6 T6, 7 T7, 8 T8, 9 T9);
tuple!(11 => 0 T0, 1 T1, 2 T2, 3 T3, 4 T4, 5 T5, 6 T6, 7 T7, 8 T8, 9 T9, 10 T10);
tuple!(12 => 0 T0, 1 T1, 2 T2, 3 T3, 4 T4, 5 T5, 6 T6, 7 T7, 8 T8, 9 T9, 10 T10, 11 T11);

#[cfg(test)]
mod tests {
    use super::Pair;
    use crate::binary::{from_bytes, to_bytes};
    use crate::xml::{from_str, to_string};
    use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

    #[test]
    fn pair_conversions() {
        let pair: Pair<i32, &str> = (1, "one").into();
        assert_eq!(Pair::new(1, "one"), pair);
        let (first, second): (i32, &str) = pair.into();
        assert_eq!((1, "one"), (first, second));
    }

    #[test]
    fn nested() {
        let mut value = BTreeMap::new();
        value.insert("a".to_string(), vec![Pair::new(1u8, BTreeSet::from(['x', 'y']))]);
        value.insert("b".to_string(), Vec::new());
        assert_eq!(value, from_bytes::<BTreeMap<String, Vec<Pair<u8, BTreeSet<char>>>>>(&to_bytes(&value).unwrap()).unwrap());
        assert_eq!(value, from_str::<BTreeMap<String, Vec<Pair<u8, BTreeSet<char>>>>>("v", &to_string(&value, "v").unwrap()).unwrap());
    }

    #[test]
    fn twelve_fields() {
        type Twelve = (u8, u16, u32, u64, i8, i16, i32, i64, f32, f64, char, String);
        let value: Twelve = (1, 2, 3, 4, 5, 6, 7, 8, 9.0, 10.0, '1', "12".to_string());
        assert_eq!(value, from_bytes::<Twelve>(&to_bytes(&value).unwrap()).unwrap());
        assert_eq!(value, from_str::<Twelve>("t", &to_string(&value, "t").unwrap()).unwrap());
    }

    #[test]
    fn deque_keeps_order() {
        let mut deque = VecDeque::new();
        deque.push_back(2);
        deque.push_front(1);
        deque.push_back(3);
        let text = to_string(&deque, "q").unwrap();
        assert_eq!(text, to_string(&vec![1, 2, 3], "q").unwrap());
        assert_eq!(deque, from_str::<VecDeque<i32>>("q", &text).unwrap());
    }

    #[test]
    fn pair_keys() {
        let map = HashMap::from([(Pair::new(1, 2), vec!["x".to_string()])]);
        assert_eq!(map, from_bytes::<HashMap<Pair<i32, i32>, Vec<String>>>(&to_bytes(&map).unwrap()).unwrap());
    }

    #[test]
    fn later_duplicate_key_wins() {
        let bytes = to_bytes(&vec![Pair::new(1, 1), Pair::new(1, 2)]).unwrap();
        // a sequence of pairs has the same layout as a mapping
        let map: BTreeMap<i32, i32> = from_bytes(&bytes).unwrap();
        assert_eq!(BTreeMap::from([(1, 2)]), map);
    }
}
