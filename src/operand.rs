//! Numeric literal and register operand parsing.

use crate::error::ErrorKind;
use crate::instructions::REG_BITS;

/// Result of trying to read a word as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    /// Value masked to the requested width.
    Value(u32),
    /// Not a well-formed literal; the caller decides whether a label may stand here.
    NotANumber,
}

/// Checks that `value`, as 32-bit two's complement, survives sign extension
/// from `bits`, then masks it down.
pub fn fit_bits(value: u32, bits: u32, text: &str) -> Result<u32, ErrorKind> {
    debug_assert!(bits > 0 && bits < 32);
    let high = u32::MAX << bits;
    let top = value & high;
    if top != 0 && top != high {
        return Err(ErrorKind::OperandOutOfRange {
            text: text.to_string(),
            bits,
        });
    }
    Ok(value & !high)
}

/// Signed field: `value` must lie in `-(1 << (bits-1))..(1 << (bits-1))`.
pub fn fit_signed(value: i64, bits: u32, text: &str) -> Result<u32, ErrorKind> {
    debug_assert!(bits > 0 && bits < 32);
    let half = 1i64 << (bits - 1);
    if value < -half || value >= half {
        return Err(ErrorKind::OperandOutOfRange {
            text: text.to_string(),
            bits,
        });
    }
    Ok(value as u32 & !(u32::MAX << bits))
}

/// Parses `[+-]digits`, `[+-]0Xhex` or `[+-]0Bbinary` into a `bits`-wide field.
pub fn parse_literal(text: &str, bits: u32) -> Result<Literal, ErrorKind> {
    match parse_raw(text, bits)? {
        Some(value) => fit_bits(value, bits, text).map(Literal::Value),
        None => Ok(Literal::NotANumber),
    }
}

/// Like [`parse_literal`] for a signed displacement field.
pub fn parse_displacement(text: &str, bits: u32) -> Result<Literal, ErrorKind> {
    match parse_raw(text, bits)? {
        Some(value) => fit_signed(i64::from(value as i32), bits, text).map(Literal::Value),
        None => Ok(Literal::NotANumber),
    }
}

/// 32-bit two's complement value of a literal, `None` when the digits are not a number.
fn parse_raw(text: &str, bits: u32) -> Result<Option<u32>, ErrorKind> {
    let (negative, body) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = match body.as_bytes() {
        [b'0', b'X', ..] => (16, &body[2..]),
        [b'0', b'B', ..] => (2, &body[2..]),
        [_, b'X' | b'B', ..] => {
            return Err(ErrorKind::MalformedConstant {
                text: text.to_string(),
            })
        }
        _ => (10, body),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Ok(None);
    }

    // anything past 32 bits cannot be sign-extended from a narrower field
    let magnitude = u32::from_str_radix(digits, radix).map_err(|_| ErrorKind::OperandOutOfRange {
        text: text.to_string(),
        bits,
    })?;
    Ok(Some(if negative {
        magnitude.wrapping_neg()
    } else {
        magnitude
    }))
}

/// Like [`parse_literal`] where only a literal is acceptable.
pub fn parse_num(text: &str, bits: u32) -> Result<u32, ErrorKind> {
    match parse_literal(text, bits)? {
        Literal::Value(v) => Ok(v),
        Literal::NotANumber => Err(ErrorKind::MalformedConstant {
            text: text.to_string(),
        }),
    }
}

/// `R0`..`R9`. Returns the digit.
pub fn parse_register(text: &str) -> Result<u8, ErrorKind> {
    match text.as_bytes() {
        [b'R', d @ b'0'..=b'9'] => Ok(d - b'0'),
        _ => Err(ErrorKind::InvalidRegister {
            text: text.to_string(),
        }),
    }
}

/// Register parsed and checked against the 3-bit register field.
pub fn register_field(text: &str) -> Result<u16, ErrorKind> {
    let r = parse_register(text)?;
    if u32::from(r) >> REG_BITS != 0 {
        return Err(ErrorKind::OperandOutOfRange {
            text: text.to_string(),
            bits: REG_BITS,
        });
    }
    Ok(u16::from(r))
}
