//! Modified UTF-8, as stored in Android binary resource string pools.
//!
//! Differs from UTF-8 in two places: U+0000 is written as the two bytes
//! `C0 80`, and supplementary code points are written as a UTF-16 surrogate
//! pair with each half packed in a 3-byte sequence.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid modified UTF-8 sequence")]
pub struct Mutf8Error;

fn push_3_byte_form(out: &mut Vec<u8>, unit: u32) {
    out.push(0xE0 | ((unit >> 12) & 0x0F) as u8);
    out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
    out.push(0x80 | (unit & 0x3F) as u8);
}

/// Encode `text` as modified UTF-8
pub fn encode(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut utf8 = [0u8; 4];

    for ch in text.chars() {
        let code_point = ch as u32;
        if code_point == 0 {
            out.extend_from_slice(&[0xC0, 0x80]);
        } else if code_point < 0x10000 {
            out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
        } else {
            let offset = code_point - 0x10000;
            let high = 0xD800 + ((offset >> 10) & 0x3FF);
            let low = 0xDC00 + (offset & 0x3FF);
            push_3_byte_form(&mut out, high);
            push_3_byte_form(&mut out, low);
        }
    }

    out
}

/// Decode modified UTF-8 back to a string
pub fn decode(bytes: &[u8]) -> Result<String, Mutf8Error> {
    cesu8::from_java_cesu8(bytes)
        .map(|text| text.into_owned())
        .map_err(|_| Mutf8Error)
}
