//! Typed extraction of basic literal values.
//!
//! Each `literal_*` function checks the literal's kind tag before parsing.
//! A wrong node or wrong kind is a [`LiteralError::KindMismatch`]; malformed
//! or out-of-range text is a [`LiteralError::Parse`]. Rules are expected to
//! treat both as "does not apply here" and carry on.
//!
//! The `parse_*` and [`unquote`] functions work on raw token text and follow
//! Go's literal grammar. They are public so that configuration values such
//! as `"0o600"` are read with exactly the same rules as source literals.

use crate::ast::{BasicLit, LitKind, Node};
use crate::matcher::try_as;
use miette::Diagnostic;
use thiserror::Error;

/// Errors from literal extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum LiteralError {
    /// The node is not a basic literal of the requested kind.
    #[error("expected {expected} literal, found {found}")]
    #[diagnostic(
        code(secmatch::literal::kind_mismatch),
        help("check the literal kind before extracting its value")
    )]
    KindMismatch {
        /// Kind the caller asked for.
        expected: LitKind,
        /// What the node actually is.
        found: String,
    },

    /// The literal text is malformed or does not fit the target type.
    #[error("invalid {kind} literal {text:?}: {reason}")]
    #[diagnostic(code(secmatch::literal::parse))]
    Parse {
        /// Kind being parsed.
        kind: LitKind,
        /// Raw text that failed.
        text: String,
        /// What went wrong.
        reason: String,
    },
}

impl LiteralError {
    fn parse(kind: LitKind, text: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            kind,
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

fn expect_lit(node: &Node, kind: LitKind) -> Result<&BasicLit, LiteralError> {
    match try_as::<BasicLit>(node) {
        Some(lit) if lit.kind == kind => Ok(lit),
        _ => Err(LiteralError::KindMismatch {
            expected: kind,
            found: node.describe(),
        }),
    }
}

/// Reads an `INT` literal as a signed 64-bit integer.
///
/// # Errors
///
/// [`LiteralError::KindMismatch`] for any other node, or
/// [`LiteralError::Parse`] for malformed or overflowing text.
pub fn literal_int(node: &Node) -> Result<i64, LiteralError> {
    parse_int(&expect_lit(node, LitKind::Int)?.value)
}

/// Reads a `FLOAT` literal as a double.
///
/// # Errors
///
/// [`LiteralError::KindMismatch`] for any other node, or
/// [`LiteralError::Parse`] for malformed or out-of-range text.
pub fn literal_float(node: &Node) -> Result<f64, LiteralError> {
    parse_float(&expect_lit(node, LitKind::Float)?.value)
}

/// Reads the first raw byte of a `CHAR` literal.
///
/// Multi-byte characters are not decoded: `'é'` yields `0xC3`, the first
/// byte of its UTF-8 encoding, and `'\n'` yields `b'\\'`.
///
/// # Errors
///
/// [`LiteralError::KindMismatch`] for any other node, or
/// [`LiteralError::Parse`] when the text is not a quoted character.
pub fn literal_char(node: &Node) -> Result<u8, LiteralError> {
    parse_char(&expect_lit(node, LitKind::Char)?.value)
}

/// Reads a `STRING` literal, decoding its escapes.
///
/// # Errors
///
/// [`LiteralError::KindMismatch`] for any other node, or
/// [`LiteralError::Parse`] for bad quoting or escapes.
pub fn literal_string(node: &Node) -> Result<String, LiteralError> {
    unquote(&expect_lit(node, LitKind::String)?.value)
}

/// Parses Go integer literal text.
///
/// Accepts an optional sign, `0x`/`0o`/`0b` prefixes in either case,
/// legacy leading-zero octal and `_` separators between digits.
///
/// # Errors
///
/// Returns [`LiteralError::Parse`] on malformed text or when the value
/// does not fit in an `i64`.
pub fn parse_int(text: &str) -> Result<i64, LiteralError> {
    let err = |reason: &str| LiteralError::parse(LitKind::Int, text, reason);

    let (negative, body) = split_sign(text);
    if body.is_empty() {
        return Err(err("empty literal"));
    }
    if body.contains('_') && !underscores_ok(body) {
        return Err(err("misplaced '_' separator"));
    }

    let (radix, digits) = split_radix(body);
    let mut value: u64 = 0;
    for ch in digits.chars().filter(|c| *c != '_') {
        let digit = ch
            .to_digit(radix)
            .ok_or_else(|| err(&format!("invalid digit {ch:?} in base {radix}")))?;
        value = value
            .checked_mul(u64::from(radix))
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or_else(|| err("value out of range"))?;
    }

    let signed = if negative {
        0i64.checked_sub_unsigned(value)
    } else {
        i64::try_from(value).ok()
    };
    signed.ok_or_else(|| err("value out of range"))
}

/// Parses Go floating-point literal text.
///
/// Accepts decimal and exponent forms, hexadecimal mantissas with a
/// mandatory `p` exponent, `_` separators, and `inf`/`nan`.
///
/// # Errors
///
/// Returns [`LiteralError::Parse`] on malformed text, or when a finite
/// literal is too large to represent.
pub fn parse_float(text: &str) -> Result<f64, LiteralError> {
    let err = |reason: &str| LiteralError::parse(LitKind::Float, text, reason);

    let (negative, body) = split_sign(text);
    if body.is_empty() || body.starts_with(['+', '-']) {
        return Err(err("malformed number"));
    }
    if body.contains('_') && !underscores_ok(body) {
        return Err(err("misplaced '_' separator"));
    }
    let cleaned: String = body.chars().filter(|c| *c != '_').collect();

    let magnitude = if let Some(hex) = strip_prefix_ci(&cleaned, "0x") {
        parse_hex_float(hex).ok_or_else(|| err("malformed hexadecimal float"))?
    } else {
        cleaned
            .parse::<f64>()
            .map_err(|e| err(&e.to_string()))?
    };

    if magnitude.is_infinite() && !is_infinity_word(&cleaned) {
        return Err(err("value out of range"));
    }
    Ok(if negative { -magnitude } else { magnitude })
}

/// Returns the first byte inside a quoted character literal.
///
/// # Errors
///
/// Returns [`LiteralError::Parse`] if the text is not `'...'` with at
/// least one byte between the quotes.
pub fn parse_char(text: &str) -> Result<u8, LiteralError> {
    text.strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .and_then(|inner| inner.bytes().next())
        .ok_or_else(|| LiteralError::parse(LitKind::Char, text, "not a quoted character"))
}

/// Decodes a quoted Go string literal.
///
/// Interpreted literals (`"..."`) have their escapes decoded. Raw literals
/// (`` `...` ``) are returned verbatim with carriage returns removed.
///
/// # Errors
///
/// Returns [`LiteralError::Parse`] for mismatched quotes, unknown or
/// truncated escapes, invalid code points, or a result that is not UTF-8.
pub fn unquote(text: &str) -> Result<String, LiteralError> {
    let err = |reason: &str| LiteralError::parse(LitKind::String, text, reason);

    let mut chars = text.chars();
    let (Some(open), Some(close)) = (chars.next(), chars.next_back()) else {
        return Err(err("missing quotes"));
    };
    if open != close {
        return Err(err("mismatched quotes"));
    }
    let inner = &text[open.len_utf8()..text.len() - close.len_utf8()];

    match open {
        '`' => {
            if inner.contains('`') {
                return Err(err("backquote inside raw string"));
            }
            Ok(inner.chars().filter(|c| *c != '\r').collect())
        }
        '"' => unescape(inner).map_err(err),
        _ => Err(err("not a string literal")),
    }
}

fn unescape(inner: &str) -> Result<String, &'static str> {
    let bytes = inner.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => return Err("unescaped quote"),
            b'\n' => return Err("newline in string"),
            b'\\' => {
                let esc = *bytes.get(i + 1).ok_or("trailing backslash")?;
                i += 2;
                match esc {
                    b'a' => out.push(0x07),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0c),
                    b'n' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    b'v' => out.push(0x0b),
                    b'\\' => out.push(b'\\'),
                    b'"' => out.push(b'"'),
                    b'x' => {
                        let value = digits_value(bytes, i, 2, 16).ok_or("invalid \\x escape")?;
                        out.push(u8::try_from(value).map_err(|_| "invalid \\x escape")?);
                        i += 2;
                    }
                    b'0'..=b'7' => {
                        let value =
                            digits_value(bytes, i - 1, 3, 8).ok_or("invalid octal escape")?;
                        out.push(u8::try_from(value).map_err(|_| "octal escape out of range")?);
                        i += 2;
                    }
                    b'u' | b'U' => {
                        let len = if esc == b'u' { 4 } else { 8 };
                        let ch = digits_value(bytes, i, len, 16)
                            .and_then(char::from_u32)
                            .ok_or("invalid unicode escape")?;
                        let mut buf = [0u8; 4];
                        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                        i += len;
                    }
                    _ => return Err("unknown escape sequence"),
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8(out).map_err(|_| "decoded string is not valid UTF-8")
}

fn digits_value(bytes: &[u8], start: usize, count: usize, radix: u32) -> Option<u32> {
    bytes
        .get(start..start + count)?
        .iter()
        .try_fold(0u32, |acc, &b| {
            acc.checked_mul(radix)?
                .checked_add(char::from(b).to_digit(radix)?)
        })
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

/// Splits an unsigned integer body into radix and digits.
fn split_radix(body: &str) -> (u32, &str) {
    if body.len() >= 3 {
        for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
            if let Some(rest) = strip_prefix_ci(body, prefix) {
                return (radix, rest);
            }
        }
    }
    match body.strip_prefix('0') {
        Some(rest) => (8, rest),
        None => (10, body),
    }
}

/// `_` may only sit between two digits, or between a base prefix and a digit.
fn underscores_ok(body: &str) -> bool {
    #[derive(PartialEq)]
    enum Saw {
        Start,
        Digit,
        Underscore,
        Other,
    }

    let bytes = body.as_bytes();
    let mut saw = Saw::Start;
    let mut i = 0;
    let mut hex = false;

    if bytes.len() >= 2
        && bytes[0] == b'0'
        && matches!(bytes[1].to_ascii_lowercase(), b'b' | b'o' | b'x')
    {
        hex = bytes[1].to_ascii_lowercase() == b'x';
        saw = Saw::Digit;
        i = 2;
    }

    for &b in &bytes[i..] {
        if b.is_ascii_digit() || (hex && b.is_ascii_hexdigit()) {
            saw = Saw::Digit;
        } else if b == b'_' {
            if saw != Saw::Digit {
                return false;
            }
            saw = Saw::Underscore;
        } else {
            if saw == Saw::Underscore {
                return false;
            }
            saw = Saw::Other;
        }
    }

    saw != Saw::Underscore
}

fn is_infinity_word(text: &str) -> bool {
    text.eq_ignore_ascii_case("inf") || text.eq_ignore_ascii_case("infinity")
}

/// Parses the part of a hex float after `0x`: `mantissa p exponent`.
#[allow(clippy::cast_precision_loss)]
fn parse_hex_float(text: &str) -> Option<f64> {
    let split = text.find(['p', 'P'])?;
    let (mantissa, exponent) = (&text[..split], &text[split + 1..]);

    let mut value: u64 = 0;
    let mut scale: i64 = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for ch in mantissa.chars() {
        if ch == '.' {
            if seen_dot {
                return None;
            }
            seen_dot = true;
            continue;
        }
        let digit = ch.to_digit(16)?;
        seen_digit = true;
        if value >> 60 == 0 {
            value = value * 16 + u64::from(digit);
            if seen_dot {
                scale -= 4;
            }
        } else if !seen_dot {
            // Mantissa is full; keep the magnitude, drop the precision.
            scale += 4;
        }
    }
    if !seen_digit {
        return None;
    }

    let (exp_negative, exp_digits) = split_sign(exponent);
    if exp_digits.is_empty() || !exp_digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let exp = exp_digits.parse::<i64>().unwrap_or(i64::MAX);
    let exp = if exp_negative { -exp } else { exp };
    let total = i32::try_from(exp.saturating_add(scale).clamp(-2000, 2000)).ok()?;

    if value == 0 {
        return Some(0.0);
    }
    // Two steps so a large mantissa with a very negative exponent does not
    // underflow before the multiplication.
    let half = total / 2;
    Some(value as f64 * 2f64.powi(half) * 2f64.powi(total - half))
}
