//! The nested element format. Every value becomes one named element below its parent, and a
//! synthetic `<serialization>` root wraps the whole document:
//!
//! ```text
//! <serialization>
//!   <std_map size="2">
//!     <_0_k val="1"/>
//!     <_0_v val="one"/>
//!     <_1_k val="2"/>
//!     <_1_v val="two"/>
//!   </std_map>
//! </serialization>
//! ```
//!
//! Per shape:
//!
//! * scalar: a `val` attribute
//! * sequence and set: a `size` attribute and the children `_0`, `_1`, ...
//! * mapping: a `size` attribute and the children `_0_k`, `_0_v`, `_1_k`, ...
//! * pair: the children `first` and `second`
//! * tuple: the children `_0` to `_{N-1}`. There is no stored arity, decoding only requires every
//!   child up to the arity of the target type to be present.
//! * aggregate: a single child `udt` which holds the aggregate's fragments as a sequence of text
//!
//! Documents can be persisted as plain text or wrapped in base64 [armor](crate::armor).

use crate::armor;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::parser;
use crate::shape::{Decode, Encode};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Name of the synthetic root element
pub const ROOT: &str = "serialization";

pub(crate) const SIZE: &str = "size";

/// Name of the `n`th child of a sequence, set or tuple
pub(crate) fn index(n: usize) -> String {
    format!("_{}", n)
}

pub(crate) fn key(n: usize) -> String {
    format!("_{}_k", n)
}

pub(crate) fn value(n: usize) -> String {
    format!("_{}_v", n)
}

/// Used to encode values into element trees.
#[derive(Debug, Clone, Default)]
pub struct XmlEncoder {
    options: Options,
}

impl XmlEncoder {

    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self { options }
    }

    /// Dispatches on the shape of `T` and appends a child named `name` to `parent`.
    pub fn encode<T: Encode + ?Sized>(&self, value: &T, name: &str, parent: &mut Element) -> Result<()> {
        if self.options.is_tracing() {
            debug!(shape = T::SHAPE.name(), ty = std::any::type_name::<T>(), element = name, "xml encode");
        }
        let mut node = Element::new(name);
        value.encode_xml(&mut node, self)?;
        parent.push(node);
        Ok(())
    }

    /// Encodes a value as the only child of a fresh document root.
    pub fn document<T: Encode + ?Sized>(&self, value: &T, name: &str) -> Result<Element> {
        let mut root = Element::new(ROOT);
        self.encode(value, name, &mut root)?;
        Ok(root)
    }

    /// Writes the `size` attribute of a container.
    pub fn write_size(&self, node: &mut Element, size: usize) {
        node.set_attribute(SIZE, size.to_string());
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

}

/// Used to decode values from element trees.
#[derive(Debug, Clone, Default)]
pub struct XmlDecoder {
    options: Options,
}

impl XmlDecoder {

    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self { options }
    }

    /// Dispatches on the shape of `T` and decodes the first child of `parent` named `name`.
    pub fn decode<T: Decode>(&self, name: &str, parent: &Element) -> Result<T> {
        self.decode_near(name, 0, parent)
    }

    /// Like [XmlDecoder::decode], but looks at the child at position `hint` first.
    pub(crate) fn decode_near<T: Decode>(&self, name: &str, hint: usize, parent: &Element) -> Result<T> {
        if self.options.is_tracing() {
            debug!(shape = T::SHAPE.name(), ty = std::any::type_name::<T>(), element = name, "xml decode");
        }
        T::decode_xml(parent.require_child(name, hint)?, self)
    }

    /// Decodes the value named `name` below a document root.
    pub fn document<T: Decode>(&self, root: &Element, name: &str) -> Result<T> {
        if root.name() != ROOT {
            return Err(Error::Root(root.name().to_owned()));
        }
        self.decode(name, root)
    }

    /// Reads the `size` attribute of a container.
    pub fn read_size(&self, node: &Element) -> Result<usize> {
        let text = node.require_attribute(SIZE)?;
        text.parse().map_err(|_| Error::Number(text.to_owned(), "usize"))
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

}

/// Parses a document without interpreting it.
pub fn parse_document(text: &str) -> Result<Element> {
    parser::parse(text)
}

pub fn to_element<T: Encode + ?Sized>(value: &T, name: &str) -> Result<Element> {
    XmlEncoder::new().document(value, name)
}

pub fn from_element<T: Decode>(root: &Element, name: &str) -> Result<T> {
    XmlDecoder::new().document(root, name)
}

/// Serializes a value into a compact document. This is also how aggregates produce the fragments
/// of their fields.
pub fn to_string<T: Encode + ?Sized>(value: &T, name: &str) -> Result<String> {
    Ok(to_element(value, name)?.to_string())
}

pub fn from_str<T: Decode>(name: &str, text: &str) -> Result<T> {
    from_element(&parse_document(text)?, name)
}

pub fn to_armored_string<T: Encode + ?Sized>(value: &T, name: &str, options: Options) -> Result<String> {
    let document = XmlEncoder::with_options(options).document(value, name)?;
    Ok(armor::encode(&document.to_string(), options.width()))
}

pub fn from_armored_str<T: Decode>(name: &str, armored: &str, options: Options) -> Result<T> {
    let text = String::from_utf8(armor::decode(armored)?)?;
    XmlDecoder::with_options(options).document(&parse_document(&text)?, name)
}

/// Writes a plain text document. A failed call may leave a truncated file behind.
pub fn save<T: Encode + ?Sized, P: AsRef<Path>>(value: &T, name: &str, path: P) -> Result<()> {
    let text = to_string(value, name)?;
    write_file(path.as_ref(), &text, &Options::default())
}

pub fn load<T: Decode, P: AsRef<Path>>(name: &str, path: P) -> Result<T> {
    from_str(name, &read_file(path.as_ref(), &Options::default())?)
}

pub fn save_armored<T: Encode + ?Sized, P: AsRef<Path>>(value: &T, name: &str, path: P) -> Result<()> {
    save_armored_with_options(value, name, path, Options::default())
}

pub fn save_armored_with_options<T, P>(value: &T, name: &str, path: P, options: Options) -> Result<()>
where
    T: Encode + ?Sized,
    P: AsRef<Path>,
{
    let armored = to_armored_string(value, name, options)?;
    write_file(path.as_ref(), &armored, &options)
}

pub fn load_armored<T: Decode, P: AsRef<Path>>(name: &str, path: P) -> Result<T> {
    load_armored_with_options(name, path, Options::default())
}

pub fn load_armored_with_options<T: Decode, P: AsRef<Path>>(name: &str, path: P, options: Options) -> Result<T> {
    let armored = read_file(path.as_ref(), &options)?;
    from_armored_str(name, &armored, options)
}

fn write_file(path: &Path, contents: &str, options: &Options) -> Result<()> {
    if options.is_tracing() {
        debug!(path = %path.display(), bytes = contents.len(), "xml save");
    }
    fs::write(path, contents).map_err(|e| Error::File(path.to_owned(), e))
}

fn read_file(path: &Path, options: &Options) -> Result<String> {
    if options.is_tracing() {
        debug!(path = %path.display(), "xml load");
    }
    let bytes = fs::read(path).map_err(|e| Error::File(path.to_owned(), e))?;
    Ok(String::from_utf8(bytes)?)
}
