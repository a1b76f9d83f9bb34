//! Text encoding for named attributes.
//!
//! Values are shown as decimal with a trailing newline and parsed with the
//! same permissive rules as the kernel's `kstrto*` helpers: an optional
//! `+`, automatic base detection and a single trailing newline.

use core::fmt::Write;

use crate::mmio::ParseError;

/// Rendered attribute value.
pub type AttrText = heapless::String<16>;

/// Renders `value` as decimal followed by a newline.
pub fn format_decimal(value: u32) -> AttrText {
    let mut text = AttrText::new();
    // 10 digits plus newline always fits.
    let _ = writeln!(text, "{value}");
    text
}

/// Parses an unsigned 32-bit integer.
///
/// Base is detected from the prefix: `0x`/`0X` followed by a hex digit
/// selects hexadecimal, any other leading `0` selects octal, anything else
/// is decimal.
///
/// ```
/// use fpga_mmio::mmio::{ParseError, text::parse_u32};
///
/// assert_eq!(parse_u32("5000\n"), Ok(5000));
/// assert_eq!(parse_u32("0x2800"), Ok(0x2800));
/// assert_eq!(parse_u32("010"), Ok(8));
/// assert_eq!(parse_u32("12abc"), Err(ParseError::Invalid));
/// ```
pub fn parse_u32(text: &str) -> Result<u32, ParseError> {
    let value = parse_unsigned(text)?;
    u32::try_from(value).map_err(|_| ParseError::Overflow)
}

/// Parses an unsigned 8-bit integer; values above 255 are `Overflow`.
pub fn parse_u8(text: &str) -> Result<u8, ParseError> {
    let value = parse_unsigned(text)?;
    u8::try_from(value).map_err(|_| ParseError::Overflow)
}

/// Parses an on/off flag.
///
/// Only the first one or two characters are significant: `y`, `t`, `e`,
/// `1` and `on` are true; `n`, `f`, `d`, `0` and `off` are false (case
/// insensitive).
pub fn parse_bool(text: &str) -> Result<bool, ParseError> {
    let bytes = text.as_bytes();
    let first = *bytes.first().ok_or(ParseError::Empty)?;
    match first.to_ascii_lowercase() {
        b'y' | b't' | b'e' | b'1' => Ok(true),
        b'n' | b'f' | b'd' | b'0' => Ok(false),
        b'o' => match bytes.get(1).map(u8::to_ascii_lowercase) {
            Some(b'n') => Ok(true),
            Some(b'f') => Ok(false),
            _ => Err(ParseError::Invalid),
        },
        _ => Err(ParseError::Invalid),
    }
}

fn parse_unsigned(text: &str) -> Result<u64, ParseError> {
    let text = text.strip_prefix('+').unwrap_or(text);
    let digits = text.strip_suffix('\n').unwrap_or(text);
    let (radix, digits) = split_radix(digits);

    if digits.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut value: u64 = 0;
    for ch in digits.chars() {
        let digit = ch.to_digit(radix).ok_or(ParseError::Invalid)?;
        value = value
            .checked_mul(u64::from(radix))
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or(ParseError::Overflow)?;
    }
    Ok(value)
}

fn split_radix(text: &str) -> (u32, &str) {
    let bytes = text.as_bytes();
    match bytes {
        [b'0', b'x' | b'X', next, ..] if next.is_ascii_hexdigit() => (16, &text[2..]),
        [b'0', ..] => (8, text),
        _ => (10, text),
    }
}
