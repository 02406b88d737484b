//! Purpose: Numeric literal rule of the decoder.
//! Exports: `parse_number`.
//! Role: Consumes the longest decimal/exponent run at the cursor and converts it to `f64`.
//! Invariants: On no match the cursor is back where it started.
//! Invariants: A dangling exponent marker (`1e`, `2E+`) is given back, not consumed.
//! Notes: Leading `+` and leading zeros are tolerated.
//! Notes: A literal that overflows to infinity is an `IllegalValue` error at its first byte.
use crate::core::cursor::Cursor;
use crate::core::error::{Error, ErrorKind};

pub fn parse_number<C: Cursor + ?Sized>(cursor: &mut C) -> Result<Option<f64>, Error> {
    let start = cursor.offset();
    let mut text = String::new();
    take_sign(cursor, &mut text)?;
    let mut digits = take_digits(cursor, &mut text)?;
    if cursor.scan(b'.')? {
        text.push('.');
        digits += take_digits(cursor, &mut text)?;
    }
    if digits == 0 {
        cursor.unread(text.as_bytes());
        return Ok(None);
    }

    if let Some(marker @ (b'e' | b'E')) = cursor.peek()? {
        cursor.advance()?;
        let mut exponent = String::from(char::from(marker));
        take_sign(cursor, &mut exponent)?;
        if take_digits(cursor, &mut exponent)? == 0 {
            cursor.unread(exponent.as_bytes());
        } else {
            text.push_str(&exponent);
        }
    }

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        Ok(_) => Err(Error::new(ErrorKind::IllegalValue)
            .with_message(format!("number {text} is out of range for a double"))
            .with_offset(start as u64)),
        Err(_) => {
            cursor.unread(text.as_bytes());
            Ok(None)
        }
    }
}

fn take_sign<C: Cursor + ?Sized>(cursor: &mut C, text: &mut String) -> Result<(), Error> {
    if let Some(sign @ (b'+' | b'-')) = cursor.peek()? {
        cursor.advance()?;
        text.push(char::from(sign));
    }
    Ok(())
}

fn take_digits<C: Cursor + ?Sized>(cursor: &mut C, text: &mut String) -> Result<usize, Error> {
    let mut count = 0;
    while let Some(digit @ b'0'..=b'9') = cursor.peek()? {
        cursor.advance()?;
        text.push(char::from(digit));
        count += 1;
    }
    Ok(count)
}
