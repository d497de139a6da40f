//! A minimal element tree: named nodes with ordered attributes and ordered children. This is all
//! the XML codec needs; text content is neither produced nor kept.
//!
//! `Display` writes the compact form, `{:#}` writes one element per line indented by two spaces.

use crate::error::{Error, Result};
use std::fmt::{self, Display, Formatter, Write};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {

    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into(), attributes: Vec::new(), children: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets an attribute, replacing any previous value under the same key.
    pub fn set_attribute<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None         => self.attributes.push((key, value)),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Returns the first child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Like [Element::child], but tries the child at position `hint` first. Indexed children are
    /// usually stored in order, which keeps decoding long sequences linear.
    pub(crate) fn child_near(&self, name: &str, hint: usize) -> Option<&Element> {
        match self.children.get(hint) {
            Some(c) if c.name == name => Some(c),
            _                         => self.child(name),
        }
    }

    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter()
    }

    pub(crate) fn require_attribute(&self, key: &'static str) -> Result<&str> {
        self.attribute(key).ok_or_else(|| Error::MissingAttribute(self.name.clone(), key))
    }

    pub(crate) fn require_child(&self, name: &str, hint: usize) -> Result<&Element> {
        self.child_near(name, hint).ok_or_else(|| Error::MissingChild(self.name.clone(), name.to_owned()))
    }

    fn write(&self, f: &mut Formatter<'_>, indent: Option<usize>) -> fmt::Result {
        if let Some(depth) = indent {
            for _ in 0..depth {
                f.write_str("  ")?;
            }
        }
        write!(f, "<{}", self.name)?;
        for (k, v) in self.attributes.iter() {
            write!(f, " {}=\"", k)?;
            escape(v, f)?;
            f.write_char('"')?;
        }
        if self.children.is_empty() {
            f.write_str("/>")?;
        } else {
            f.write_char('>')?;
            for child in self.children.iter() {
                if indent.is_some() {
                    f.write_char('\n')?;
                }
                child.write(f, indent.map(|depth| depth + 1))?;
            }
            if let Some(depth) = indent {
                f.write_char('\n')?;
                for _ in 0..depth {
                    f.write_str("  ")?;
                }
            }
            write!(f, "</{}>", self.name)?;
        }
        Ok(())
    }

}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write(f, if f.alternate() { Some(0) } else { None })
    }
}

/// Control characters are written as numeric references so that attribute values survive a
/// round-trip verbatim, including embedded NUL.
fn escape(value: &str, f: &mut Formatter<'_>) -> fmt::Result {
    for c in value.chars() {
        match c {
            '&'                => f.write_str("&amp;")?,
            '<'                => f.write_str("&lt;")?,
            '>'                => f.write_str("&gt;")?,
            '"'                => f.write_str("&quot;")?,
            c if c.is_control() => write!(f, "&#x{:X};", u32::from(c))?,
            c                  => f.write_char(c)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Element;
    use crate::error::Error;

    fn sample() -> Element {
        let mut root = Element::new("serialization");
        let mut seq = Element::new("std_vector");
        seq.set_attribute("size", "2");
        for (i, v) in ["1", "2"].iter().enumerate() {
            let mut child = Element::new(format!("_{}", i));
            child.set_attribute("val", *v);
            seq.push(child);
        }
        root.push(seq);
        root
    }

    #[test]
    fn compact() {
        assert_eq!(
            "<serialization><std_vector size=\"2\"><_0 val=\"1\"/><_1 val=\"2\"/></std_vector></serialization>",
            sample().to_string()
        );
    }

    #[test]
    fn pretty() {
        assert_eq!(
            "<serialization>\n  <std_vector size=\"2\">\n    <_0 val=\"1\"/>\n    <_1 val=\"2\"/>\n  </std_vector>\n</serialization>",
            format!("{:#}", sample())
        );
    }

    #[test]
    fn escaping() {
        let mut e = Element::new("s");
        e.set_attribute("val", "a<b & \"c\"\n\0'");
        assert_eq!("<s val=\"a&lt;b &amp; &quot;c&quot;&#xA;&#x0;'\"/>", e.to_string());
    }

    #[test]
    fn attributes_replace() {
        let mut e = Element::new("s");
        e.set_attribute("val", "1");
        e.set_attribute("val", "2");
        assert_eq!(Some("2"), e.attribute("val"));
        assert_eq!(1, e.attributes().count());
    }

    #[test]
    fn lookup() {
        let root = sample();
        let seq = root.child("std_vector").unwrap();
        assert_eq!(Some("2"), seq.child_near("_1", 1).unwrap().attribute("val"));
        assert_eq!(Some("1"), seq.child_near("_0", 1).unwrap().attribute("val"));
        assert!(matches!(seq.require_child("_2", 2).unwrap_err(), Error::MissingChild(ref p, ref c) if p == "std_vector" && c == "_2"));
        assert!(matches!(seq.require_attribute("val").unwrap_err(), Error::MissingAttribute(_, "val")));
    }
}
