use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// The three ways an encode or decode call can fail at runtime. A value whose type has no shape
/// never gets this far: it is rejected by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A stream or file could not be opened, or a read or write did not complete.
    Stream,
    /// The encoded structure does not match what the target type requires.
    Format,
    /// A textual scalar could not be converted into its target type.
    Parse,
}

#[derive(Debug)]
pub enum Error {
    // Stream
    Io(std::io::Error),
    File(PathBuf, std::io::Error),
    Eof(u64),
    // Format
    Width { declared: u64, expected: usize },
    Length(u64),
    Arity { expected: usize, found: u64 },
    Trailing(usize),
    MissingAttribute(String, &'static str),
    MissingChild(String, String),
    Root(String),
    Markup { at: usize, reason: String },
    Armor(base64::DecodeError),
    Message(String),
    // Parse
    Utf8(std::string::FromUtf8Error),
    Number(String, &'static str),
}

impl Error {

    /// Used by aggregates to report inconsistencies in their own fragments.
    pub fn custom<T: Display>(msg: T) -> Error {
        Error::Message(msg.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) | Error::File(_, _) | Error::Eof(_) => ErrorKind::Stream,
            Error::Utf8(_) | Error::Number(_, _)             => ErrorKind::Parse,
            _                                                => ErrorKind::Format,
        }
    }

}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) | Error::File(_, e) => Some(e),
            Error::Armor(e) => Some(e),
            Error::Utf8(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error {}", e),
            Error::File(path, e) => write!(f, "Could not access {}: {}", path.display(), e),
            Error::Eof(len) => write!(f, "Unexpected end of stream while reading {} declared bytes", len),
            Error::Width { declared, expected } => write!(f, "Scalar declares {} bytes but its type is {} bytes wide", declared, expected),
            Error::Length(value) => write!(f, "Length {} exceeds maximum {}", value, usize::MAX),
            Error::Arity { expected, found } => write!(f, "Tuple arity mismatch: expected {}, found {}", expected, found),
            Error::Trailing(count) => write!(f, "{} trailing bytes in input", count),
            Error::MissingAttribute(element, attribute) => write!(f, "Element <{}> lacks attribute `{}`", element, attribute),
            Error::MissingChild(element, child) => write!(f, "Element <{}> lacks child <{}>", element, child),
            Error::Root(found) => write!(f, "Document root must be <{}>, found <{}>", crate::xml::ROOT, found),
            Error::Markup { at, reason } => write!(f, "Malformed document at byte {}: {}", at, reason),
            Error::Armor(e) => write!(f, "Invalid base64 armor: {}", e),
            Error::Message(msg) => f.write_str(msg),
            Error::Utf8(e) => write!(f, "Text was not valid Utf-8: {}", e),
            Error::Number(text, target) => write!(f, "`{}` could not be parsed as {}", text, target),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(e: std::string::FromUtf8Error) -> Error {
        Error::Utf8(e)
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Error {
        Error::Armor(e)
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn kinds() {
        assert_eq!(ErrorKind::Stream, Error::Eof(8).kind());
        assert_eq!(ErrorKind::Stream, Error::from(std::io::Error::from(std::io::ErrorKind::NotFound)).kind());
        assert_eq!(ErrorKind::Format, Error::Arity { expected: 3, found: 2 }.kind());
        assert_eq!(ErrorKind::Format, Error::custom("index out of range").kind());
        assert_eq!(ErrorKind::Parse, Error::Number("x1".into(), "i32").kind());
    }

    #[test]
    fn display() {
        assert_eq!("Element <std_vector> lacks attribute `size`", Error::MissingAttribute("std_vector".into(), "size").to_string());
        assert_eq!("`abc` could not be parsed as u8", Error::Number("abc".into(), "u8").to_string());
    }
}
