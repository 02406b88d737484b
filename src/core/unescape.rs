//! Purpose: Second phase of string decoding: turn raw string bytes into text.
//! Exports: `unescape`, `encode_code_point`.
//! Role: Pure helpers called by the decoder once the closing quote is found.
//! Invariants: Each escape is consumed exactly once; `\\` never re-escapes what follows it.
//! Invariants: Output is valid UTF-8 or the call fails with `InvalidUtf8`.
//! Notes: Unknown escapes pass the escaped byte through literally.
use crate::core::error::{Error, ErrorKind};

const HIGH_SURROGATES: std::ops::RangeInclusive<u32> = 0xD800..=0xDBFF;
const LOW_SURROGATES: std::ops::RangeInclusive<u32> = 0xDC00..=0xDFFF;

pub fn unescape(raw: &[u8]) -> Result<String, Error> {
    if !raw.contains(&b'\\') {
        return into_text(raw.to_vec());
    }

    let mut out = Vec::with_capacity(raw.len());
    let mut idx = 0;
    while idx < raw.len() {
        let byte = raw[idx];
        if byte != b'\\' {
            out.push(byte);
            idx += 1;
            continue;
        }
        let Some(&escaped) = raw.get(idx + 1) else {
            out.push(b'\\');
            break;
        };
        idx += 2;
        match escaped {
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'u' => {
                let (code_point, used) = unicode_escape(&raw[idx..])?;
                encode_code_point(code_point, &mut out)?;
                idx += used;
            }
            other => out.push(other),
        }
    }
    into_text(out)
}

/// Append the UTF-8 encoding of `code_point` to `out`.
pub fn encode_code_point(cp: u32, out: &mut Vec<u8>) -> Result<(), Error> {
    if cp < 0x80 {
        out.push(cp as u8);
    } else if cp < 0x800 {
        out.push(0xC0 | (cp >> 6) as u8);
        out.push(0x80 | (cp & 0x3F) as u8);
    } else if cp < 0x1_0000 {
        out.push(0xE0 | (cp >> 12) as u8);
        out.push(0x80 | ((cp >> 6) & 0x3F) as u8);
        out.push(0x80 | (cp & 0x3F) as u8);
    } else if cp < 0x11_0000 {
        out.push(0xF0 | (cp >> 18) as u8);
        out.push(0x80 | ((cp >> 12) & 0x3F) as u8);
        out.push(0x80 | ((cp >> 6) & 0x3F) as u8);
        out.push(0x80 | (cp & 0x3F) as u8);
    } else {
        return Err(unicode_error(format!(
            "code point U+{cp:X} is beyond U+10FFFF"
        )));
    }
    Ok(())
}

// `rest` starts right after `\u`. Returns the code point and how many bytes
// of `rest` it used (4, or 10 for a surrogate pair).
fn unicode_escape(rest: &[u8]) -> Result<(u32, usize), Error> {
    let unit = hex4(rest)?;
    if LOW_SURROGATES.contains(&unit) {
        return Err(unicode_error(format!("unpaired low surrogate \\u{unit:04X}")));
    }
    if !HIGH_SURROGATES.contains(&unit) {
        return Ok((unit, 4));
    }

    let trail = rest.get(4..6) == Some(b"\\u".as_slice());
    let low = if trail { hex4(&rest[6..]).ok() } else { None };
    match low {
        Some(low) if LOW_SURROGATES.contains(&low) => {
            let code_point = 0x1_0000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
            Ok((code_point, 10))
        }
        _ => Err(unicode_error(format!(
            "unpaired high surrogate \\u{unit:04X}"
        ))),
    }
}

fn hex4(bytes: &[u8]) -> Result<u32, Error> {
    let Some(digits) = bytes.get(..4) else {
        return Err(unicode_error("\\u escape needs 4 hex digits"));
    };
    digits.iter().try_fold(0u32, |acc, &digit| {
        char::from(digit)
            .to_digit(16)
            .map(|nibble| (acc << 4) | nibble)
            .ok_or_else(|| {
                unicode_error(format!(
                    "invalid hex digit {:?} in \\u escape",
                    char::from(digit)
                ))
            })
    })
}

fn unicode_error(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::InvalidUnicodeEscape).with_message(message)
}

fn into_text(bytes: Vec<u8>) -> Result<String, Error> {
    String::from_utf8(bytes).map_err(|err| {
        Error::new(ErrorKind::InvalidUtf8)
            .with_message("string is not valid UTF-8")
            .with_source(err)
    })
}
