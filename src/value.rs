//! Typed scalar values.
//!
//! A [`Value`] is built from a scalar [`Token`] (or synthesized as
//! [`Value::Zero`] for an omitted field) and keeps the token's raw text. All
//! interpretation is deferred to the conversion methods, which are pure and
//! can be called any number of times:
//!
//! | kind         | string | int | uint | float | bool |
//! |--------------|--------|-----|------|-------|------|
//! | `zero`       |        |     |      |       |      |
//! | `nil`        |        |     |      |       |      |
//! | `boolean`    |        |     |      |       | yes  |
//! | `number`     | yes    | yes | yes  | yes   |      |
//! | `string`     | yes    |     |      |       |      |
//! | `identifier` | yes    |     |      |       |      |
//!
//! Unsupported combinations fail with [`Error::NotConvertible`].
//!
//! ## Examples
//!
//! ```rust
//! use plainfields::Value;
//!
//! let hex = Value::Number("0x23".into());
//! assert_eq!(hex.to_int().unwrap(), 35);
//! assert_eq!(hex.to_uint().unwrap(), 35);
//! assert_eq!(hex.to_float().unwrap(), 35.0);
//! assert!(hex.to_bool().is_err());
//!
//! let quoted = Value::String(r#""a\tb""#.into());
//! assert_eq!(quoted.to_text().unwrap(), "a\tb");
//! ```

use crate::{Error, Result, Token, TokenKind};
use std::borrow::Cow;
use std::fmt;

/// The kind of a [`Value`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Zero,
    Nil,
    Boolean,
    Number,
    String,
    Identifier,
}

impl ValueKind {
    pub const ALL: [ValueKind; 6] = [
        ValueKind::Zero,
        ValueKind::Nil,
        ValueKind::Boolean,
        ValueKind::Number,
        ValueKind::String,
        ValueKind::Identifier,
    ];

    /// Returns `true` if values of this kind can be converted to `target`.
    #[must_use]
    pub const fn supports(self, target: Conversion) -> bool {
        match self {
            ValueKind::Zero | ValueKind::Nil => false,
            ValueKind::Boolean => matches!(target, Conversion::Bool),
            ValueKind::Number => !matches!(target, Conversion::Bool),
            ValueKind::String | ValueKind::Identifier => matches!(target, Conversion::String),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ValueKind::Zero => "zero",
            ValueKind::Nil => "nil",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Identifier => "identifier",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A conversion target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Conversion {
    String,
    Int,
    Uint,
    Float,
    Bool,
}

impl Conversion {
    pub const ALL: [Conversion; 5] = [
        Conversion::String,
        Conversion::Int,
        Conversion::Uint,
        Conversion::Float,
        Conversion::Bool,
    ];
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Conversion::String => "string",
            Conversion::Int => "int",
            Conversion::Uint => "uint",
            Conversion::Float => "float",
            Conversion::Bool => "bool",
        })
    }
}

/// A scalar value together with the raw text it was scanned from.
///
/// `String` keeps its surrounding quotes, `Number` keeps sign, base prefix and
/// `_` separators.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value<'a> {
    /// Synthesized for an omitted value: `a=`, `,` or `a,,b`.
    Zero,
    Nil,
    Boolean(Cow<'a, str>),
    Number(Cow<'a, str>),
    String(Cow<'a, str>),
    Identifier(Cow<'a, str>),
}

impl<'a> Value<'a> {
    /// Builds a value from a scalar token. Returns `None` for tokens that are
    /// not values (separators, prefixes, `=`, errors and end of input).
    #[must_use]
    pub fn from_token(token: Token<'a>) -> Option<Self> {
        let value = match token.kind {
            TokenKind::Identifier => Value::Identifier(token.text),
            TokenKind::Number => Value::Number(token.text),
            TokenKind::String => Value::String(token.text),
            TokenKind::True | TokenKind::False => Value::Boolean(token.text),
            TokenKind::Nil => Value::Nil,
            TokenKind::Error
            | TokenKind::EndOfInput
            | TokenKind::BooleanPrefix
            | TokenKind::Assign
            | TokenKind::FieldSeparator
            | TokenKind::ListSeparator
            | TokenKind::PairSeparator => return None,
        };
        Some(value)
    }

    /// A boolean value with the canonical raw text.
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Value::Boolean(Cow::Borrowed(if value { "true" } else { "false" }))
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Zero => ValueKind::Zero,
            Value::Nil => ValueKind::Nil,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Identifier(_) => ValueKind::Identifier,
        }
    }

    /// The raw text of the value. `Zero` and `Nil` report `"zero"` and `"nil"`.
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Value::Zero => "zero",
            Value::Nil => "nil",
            Value::Boolean(raw)
            | Value::Number(raw)
            | Value::String(raw)
            | Value::Identifier(raw) => raw.as_ref(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Returns `true` for the empty or zero value of each kind.
    ///
    /// `Zero`, `false`, numbers equal to `0` and the empty quoted string
    /// (`""` or `''`) are zero. `Nil` and identifiers never are.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Zero => true,
            Value::Nil | Value::Identifier(_) => false,
            Value::Boolean(raw) => raw == "false",
            Value::Number(_) => self.to_float().is_ok_and(|f| f == 0.0),
            Value::String(raw) => raw.len() == 2,
        }
    }

    /// Returns `true` for numbers written with a fraction or exponent.
    #[must_use]
    pub fn is_float(&self) -> bool {
        let Value::Number(raw) = self else {
            return false;
        };
        let body = raw.trim_start_matches(['+', '-']);
        if has_prefix(body, 'x') {
            body.contains(['.', 'p', 'P'])
        } else if has_prefix(body, 'o') || has_prefix(body, 'b') {
            false
        } else {
            body.contains(['.', 'e', 'E'])
        }
    }

    /// Returns `true` for numbers written with a leading `-`.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        matches!(self, Value::Number(raw) if raw.starts_with('-'))
    }

    /// Converts to text. Strings are unquoted and de-escaped, identifiers and
    /// numbers are returned as written.
    pub fn to_text(&self) -> Result<String> {
        match self {
            Value::String(raw) => unquote(raw).map(Cow::into_owned),
            Value::Identifier(raw) | Value::Number(raw) => Ok(raw.to_string()),
            Value::Zero | Value::Nil | Value::Boolean(_) => Err(self.not_convertible(Conversion::String)),
        }
    }

    /// Like [`Value::to_text`], but keeps borrowing from the input when the
    /// text needs no de-escaping.
    pub fn into_text(self) -> Result<Cow<'a, str>> {
        match self {
            Value::String(Cow::Borrowed(raw)) => unquote(raw),
            Value::String(Cow::Owned(raw)) => unquote(&raw).map(|text| Cow::Owned(text.into_owned())),
            Value::Identifier(raw) | Value::Number(raw) => Ok(raw),
            Value::Zero | Value::Nil | Value::Boolean(_) => Err(self.not_convertible(Conversion::String)),
        }
    }

    /// Converts a number to `i64`, honoring `0x`, `0o` and `0b` prefixes.
    pub fn to_int(&self) -> Result<i64> {
        match self {
            Value::Number(raw) => {
                let digits = strip_separators(raw);
                let number = NumberParts::split(&digits);
                Ok(i64::from_str_radix(&number.signed_digits(), number.radix)?)
            }
            Value::Zero | Value::Nil | Value::Boolean(_) | Value::String(_) | Value::Identifier(_) => {
                Err(self.not_convertible(Conversion::Int))
            }
        }
    }

    /// Converts a number to `u64`. A leading `-` is rejected.
    pub fn to_uint(&self) -> Result<u64> {
        match self {
            Value::Number(raw) => {
                let digits = strip_separators(raw);
                let number = NumberParts::split(&digits);
                Ok(u64::from_str_radix(&number.signed_digits(), number.radix)?)
            }
            Value::Zero | Value::Nil | Value::Boolean(_) | Value::String(_) | Value::Identifier(_) => {
                Err(self.not_convertible(Conversion::Uint))
            }
        }
    }

    /// Converts a number to `f64`.
    ///
    /// Decimal and scientific notation, hex floats with or without a `p`
    /// exponent, and hex, octal or binary integers are accepted.
    pub fn to_float(&self) -> Result<f64> {
        match self {
            Value::Number(raw) => parse_float(raw),
            Value::Zero | Value::Nil | Value::Boolean(_) | Value::String(_) | Value::Identifier(_) => {
                Err(self.not_convertible(Conversion::Float))
            }
        }
    }

    pub fn to_bool(&self) -> Result<bool> {
        match self {
            Value::Boolean(raw) => match raw.as_ref() {
                "true" => Ok(true),
                "false" => Ok(false),
                other => Err(Error::InvalidBoolean(other.to_string())),
            },
            Value::Zero | Value::Nil | Value::Number(_) | Value::String(_) | Value::Identifier(_) => {
                Err(self.not_convertible(Conversion::Bool))
            }
        }
    }

    /// Detaches the value from the input it was scanned from.
    #[must_use]
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Zero => Value::Zero,
            Value::Nil => Value::Nil,
            Value::Boolean(raw) => Value::Boolean(Cow::Owned(raw.into_owned())),
            Value::Number(raw) => Value::Number(Cow::Owned(raw.into_owned())),
            Value::String(raw) => Value::String(Cow::Owned(raw.into_owned())),
            Value::Identifier(raw) => Value::Identifier(Cow::Owned(raw.into_owned())),
        }
    }

    fn not_convertible(&self, target: Conversion) -> Error {
        Error::not_convertible(self.kind(), target)
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.raw(), self.kind())
    }
}

impl TryFrom<&Value<'_>> for String {
    type Error = Error;

    fn try_from(value: &Value<'_>) -> Result<Self> {
        value.to_text()
    }
}

impl TryFrom<&Value<'_>> for i64 {
    type Error = Error;

    fn try_from(value: &Value<'_>) -> Result<Self> {
        value.to_int()
    }
}

impl TryFrom<&Value<'_>> for u64 {
    type Error = Error;

    fn try_from(value: &Value<'_>) -> Result<Self> {
        value.to_uint()
    }
}

impl TryFrom<&Value<'_>> for f64 {
    type Error = Error;

    fn try_from(value: &Value<'_>) -> Result<Self> {
        value.to_float()
    }
}

impl TryFrom<&Value<'_>> for bool {
    type Error = Error;

    fn try_from(value: &Value<'_>) -> Result<Self> {
        value.to_bool()
    }
}

fn strip_separators(raw: &str) -> Cow<'_, str> {
    if raw.contains('_') {
        Cow::Owned(raw.replace('_', ""))
    } else {
        Cow::Borrowed(raw)
    }
}

/// `0x`, `0X`, ... for the given lowercase marker.
fn has_prefix(body: &str, marker: char) -> bool {
    let mut chars = body.chars();
    chars.next() == Some('0') && chars.next().is_some_and(|c| c.to_ascii_lowercase() == marker)
}

/// A numeric literal split into sign, radix and digits (prefix removed).
struct NumberParts<'s> {
    sign: &'s str,
    radix: u32,
    digits: &'s str,
}

impl<'s> NumberParts<'s> {
    fn split(text: &'s str) -> Self {
        let body = text.trim_start_matches(['+', '-']);
        let sign = &text[..text.len() - body.len()];
        let (radix, digits) = if has_prefix(body, 'x') {
            (16, &body[2..])
        } else if has_prefix(body, 'o') {
            (8, &body[2..])
        } else if has_prefix(body, 'b') {
            (2, &body[2..])
        } else {
            (10, body)
        };
        NumberParts {
            sign,
            radix,
            digits,
        }
    }

    fn signed_digits(&self) -> Cow<'s, str> {
        if self.sign.is_empty() {
            Cow::Borrowed(self.digits)
        } else {
            Cow::Owned(format!("{}{}", self.sign, self.digits))
        }
    }

    fn is_negative(&self) -> bool {
        self.sign.ends_with('-')
    }
}

fn parse_float(raw: &str) -> Result<f64> {
    let text = strip_separators(raw);
    let number = NumberParts::split(&text);

    let magnitude = match number.radix {
        16 => {
            if let Some(split) = number.digits.find(['p', 'P']) {
                let (mantissa, exponent) = (&number.digits[..split], &number.digits[split + 1..]);
                parse_hex_scaled(raw, mantissa, exponent)?
            } else {
                parse_hex_mantissa(raw, number.digits)?
            }
        }
        8 | 2 => u64::from_str_radix(number.digits, number.radix)? as f64,
        _ => return Ok(text.parse::<f64>()?),
    };

    if number.is_negative() {
        Ok(-magnitude)
    } else {
        Ok(magnitude)
    }
}

/// Reads `int[.frac]` hex digits as integer part plus `frac / 16^len(frac)`.
fn parse_hex_mantissa(raw: &str, mantissa: &str) -> Result<f64> {
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (mantissa, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(Error::InvalidHexFloat(raw.to_string()));
    }

    let mut value = 0.0;
    if !int_part.is_empty() {
        value = u64::from_str_radix(int_part, 16)? as f64;
    }
    if !frac_part.is_empty() {
        let frac = u64::from_str_radix(frac_part, 16)? as f64;
        let places = i32::try_from(frac_part.len())
            .map_err(|_| Error::InvalidHexFloat(raw.to_string()))?;
        value += frac / 16f64.powi(places);
    }
    Ok(value)
}

/// Significant bits collected from a hex mantissa before the remaining digits
/// only count toward rounding.
const MANTISSA_BITS: u32 = 60;

/// Reads `int[.frac]p[sign]exp` as `mantissa * 2^exp`, rounded once to the
/// nearest `f64` (ties to even). Out of range results become `0.0` or
/// infinity.
fn parse_hex_scaled(raw: &str, mantissa: &str, exponent: &str) -> Result<f64> {
    let invalid = || Error::InvalidHexFloat(raw.to_string());
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }

    let mut bits: u64 = 0;
    let mut scale = parse_exponent(exponent).ok_or_else(invalid)?;
    let mut sticky = false;
    let digits = int_part
        .chars()
        .map(|c| (c, false))
        .chain(frac_part.chars().map(|c| (c, true)));
    for (ch, fraction) in digits {
        let digit = ch.to_digit(16).ok_or_else(invalid)?;
        if bits >> (MANTISSA_BITS - 4) == 0 {
            bits = (bits << 4) | u64::from(digit);
            if fraction {
                scale = scale.saturating_sub(4);
            }
        } else {
            sticky |= digit != 0;
            if !fraction {
                scale = scale.saturating_add(4);
            }
        }
    }
    Ok(round_to_f64(bits, scale, sticky))
}

fn parse_exponent(text: &str) -> Option<i64> {
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() {
        return None;
    }
    let mut value: i64 = 0;
    for ch in digits.chars() {
        let digit = i64::from(ch.to_digit(10)?);
        value = value.saturating_mul(10).saturating_add(digit);
    }
    Some(if negative { -value } else { value })
}

/// Rounds `bits * 2^scale` to an `f64`. `sticky` marks nonzero digits that
/// were dropped below `bits`.
fn round_to_f64(bits: u64, scale: i64, sticky: bool) -> f64 {
    if bits == 0 {
        return 0.0;
    }
    let width = i64::from(64 - bits.leading_zeros());
    let top = scale.saturating_add(width - 1);
    if top > f64::MAX_EXP as i64 - 1 {
        return f64::INFINITY;
    }
    // Subnormals keep fewer bits; 2^-1074 is the smallest step.
    let keep = top.saturating_add(1075).min(f64::MANTISSA_DIGITS as i64);
    if keep < 0 {
        return 0.0;
    }

    let drop = width - keep;
    if drop <= 0 {
        return scale_by_power_of_two(bits as f64, scale);
    }
    let mut kept = bits >> drop;
    let remainder = bits & ((1u64 << drop) - 1);
    let half = 1u64 << (drop - 1);
    if remainder > half || (remainder == half && (sticky || kept & 1 == 1)) {
        kept += 1;
    }
    scale_by_power_of_two(kept as f64, scale + drop)
}

/// Multiplies by `2^exponent` in steps that stay within `powi`'s exact range.
fn scale_by_power_of_two(mut value: f64, mut exponent: i64) -> f64 {
    while exponent > 1000 {
        value *= 2f64.powi(1000);
        exponent -= 1000;
    }
    while exponent < -1000 {
        value *= 2f64.powi(-1000);
        exponent += 1000;
    }
    value * 2f64.powi(exponent as i32)
}

/// Removes the surrounding quotes of a string literal and interprets its
/// backslash escapes. Borrows from `raw` when there is nothing to unescape.
pub(crate) fn unquote(raw: &str) -> Result<Cow<'_, str>> {
    let mut chars = raw.chars();
    let quote = match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && matches!(open, '"' | '\'') => open,
        _ => return Err(Error::invalid_string(raw, "missing surrounding quotes")),
    };
    let inner = chars.as_str();

    if !inner.contains('\\') {
        if inner.contains(quote) {
            return Err(Error::invalid_string(raw, "unescaped quote"));
        }
        return Ok(Cow::Borrowed(inner));
    }

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == quote {
            return Err(Error::invalid_string(raw, "unescaped quote"));
        }
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        let escaped = match chars.next() {
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('v') => '\u{b}',
            Some('a') => '\u{7}',
            Some(c @ ('\\' | '\'' | '"')) => c,
            Some('x') => code_point(raw, &mut chars, 2, 16)?,
            Some('u') => code_point(raw, &mut chars, 4, 16)?,
            Some('U') => code_point(raw, &mut chars, 8, 16)?,
            Some(c @ '0'..='7') => {
                let rest = code_point(raw, &mut chars, 2, 8)? as u32;
                let value = (c as u32 - '0' as u32) * 64 + rest;
                char::from_u32(value)
                    .filter(|_| value <= 0xFF)
                    .ok_or_else(|| Error::invalid_string(raw, "octal escape out of range"))?
            }
            Some(other) => {
                return Err(Error::invalid_string(
                    raw,
                    format!("unknown escape sequence \\{other}"),
                ))
            }
            None => return Err(Error::invalid_string(raw, "unterminated escape sequence")),
        };
        out.push(escaped);
    }
    Ok(Cow::Owned(out))
}

/// Reads exactly `len` digits in `radix` and returns the code point they name.
fn code_point(raw: &str, chars: &mut std::str::Chars<'_>, len: usize, radix: u32) -> Result<char> {
    let mut value = 0u32;
    for _ in 0..len {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(radix))
            .ok_or_else(|| Error::invalid_string(raw, "malformed escape sequence"))?;
        value = value * radix + digit;
    }
    char::from_u32(value).ok_or_else(|| Error::invalid_string(raw, "invalid code point in escape"))
}
