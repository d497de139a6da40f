//! Base64 armor for text documents that have to travel through channels which must not see raw
//! markup. Encoding uses the standard alphabet with padding, wrapped into lines like PEM. Decoding
//! is tolerant: whitespace anywhere is ignored and missing padding is restored.

use crate::error::Result;

/// Encodes `input` and wraps the output every `width` characters. A width of zero yields a single
/// line. The output always ends with a newline.
pub fn encode<B: ?Sized + AsRef<[u8]>>(input: &B, width: usize) -> String {
    let b64 = base64::encode(input.as_ref());
    let breaks = if width == 0 { 0 } else { b64.len() / width };
    let mut out = String::with_capacity(b64.len() + breaks + 1);
    for (i, c) in b64.chars().enumerate() {
        if width > 0 && i > 0 && i % width == 0 {
            out.push('\n');
        }
        out.push(c);
    }
    out.push('\n');
    out
}

pub fn decode<B: ?Sized + AsRef<[u8]>>(armored: &B) -> Result<Vec<u8>> {
    let mut compact: Vec<u8> = armored.as_ref().iter().copied().filter(|b| !b.is_ascii_whitespace()).collect();
    while compact.len() % 4 != 0 {
        compact.push(b'=');
    }
    Ok(base64::decode(&compact)?)
}
