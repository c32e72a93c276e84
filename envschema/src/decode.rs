//! Scalar and collection decoding
//!
//! [`decode`] converts raw text into a [`Value`] of a non-optional
//! [`Category`]. Presence and blankness are the resolver's business; here the
//! raw text is taken as given.
//!
//! Numbers are trimmed and may use `_` between digits (`1_000`). Integers are
//! checked against the range of the field's integer type, floats declared as
//! `f32` against the range of `f32`.

use std::borrow::Cow;
use std::sync::Arc;

use crate::classify::{Category, ElementKind};
use crate::error::DecodeError;
use crate::types::{EnumType, FloatKind, IntKind, Literal};
use crate::value::{EnumValue, Value};

/// Decode `raw` according to `category`.
pub fn decode(category: &Category, raw: &str) -> Result<Value, DecodeError> {
    match category {
        Category::Str => Ok(Value::Str(raw.to_string())),
        Category::Int(kind) => parse_int(*kind, raw).map(Value::Int),
        Category::Float(kind) => parse_float(*kind, raw).map(Value::Float),
        Category::Bool => Ok(Value::Bool(truthy(raw))),
        Category::Json => serde_json::from_str(raw)
            .map(Value::Json)
            .map_err(DecodeError::Json),
        Category::Enumeration(ty) => decode_enum(ty, raw),
        Category::LiteralSet(allowed) => decode_literal(allowed, raw).map(Value::from),
        Category::Sequence(kind) => decode_sequence(*kind, raw),
        Category::Unsupported => Err(DecodeError::Unsupported),
    }
}

/// Truthiness of raw text.
///
/// `false` only for exactly `"false"` (any case) or exactly `"0"`. Nothing is
/// trimmed, so `" false "` is `true`, as is `"no"`.
pub fn truthy(raw: &str) -> bool {
    raw.to_lowercase() != "false" && raw != "0"
}

/// Strip `_` separators that sit between two digits. Text with any other
/// underscore is returned untouched, so the parser rejects it.
fn without_separators(text: &str) -> Cow<'_, str> {
    if !text.contains('_') {
        return Cow::Borrowed(text);
    }
    let bytes = text.as_bytes();
    let separated = bytes.iter().enumerate().all(|(i, &b)| {
        b != b'_'
            || (i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    });
    if separated {
        Cow::Owned(text.replace('_', ""))
    } else {
        Cow::Borrowed(text)
    }
}

fn parse_int(kind: IntKind, raw: &str) -> Result<i128, DecodeError> {
    let n = without_separators(raw.trim())
        .parse::<i128>()
        .map_err(|e| DecodeError::numeric("integer", raw, e))?;
    if !kind.contains(n) {
        return Err(DecodeError::numeric(
            "integer",
            raw,
            format!(
                "out of range for {} ({}..={})",
                kind.name(),
                kind.min(),
                kind.max()
            ),
        ));
    }
    Ok(n)
}

fn parse_float(kind: FloatKind, raw: &str) -> Result<f64, DecodeError> {
    let x = without_separators(raw.trim())
        .parse::<f64>()
        .map_err(|e| DecodeError::numeric("float", raw, e))?;
    if !kind.fits(x) {
        return Err(DecodeError::numeric(
            "float",
            raw,
            format!("out of range for {}", kind.name()),
        ));
    }
    Ok(x)
}

fn decode_enum(ty: &Arc<EnumType>, raw: &str) -> Result<Value, DecodeError> {
    match ty.find_by_repr(raw) {
        Some(member) => Ok(Value::Enum(EnumValue::new(Arc::clone(ty), member.clone()))),
        None => Err(DecodeError::Enum {
            enum_name: ty.name().to_string(),
            value: raw.to_string(),
        }),
    }
}

fn decode_literal(allowed: &[Literal], raw: &str) -> Result<Literal, DecodeError> {
    if let Some(exact) = allowed.iter().find(|lit| lit.as_text() == raw) {
        return Ok(exact.clone());
    }

    allowed
        .iter()
        .find(|candidate| coerces_to(candidate, raw))
        .cloned()
        .ok_or_else(|| DecodeError::Literal {
            value: raw.to_string(),
            allowed: allowed.to_vec(),
        })
}

fn coerces_to(candidate: &Literal, raw: &str) -> bool {
    match candidate {
        Literal::Bool(b) => truthy(raw) == *b,
        Literal::Int(n) => without_separators(raw.trim())
            .parse::<i64>()
            .is_ok_and(|parsed| parsed == *n),
        Literal::Float(x) => without_separators(raw.trim())
            .parse::<f64>()
            .is_ok_and(|parsed| parsed == *x),
        Literal::Str(s) => s == raw,
    }
}

fn decode_sequence(kind: ElementKind, raw: &str) -> Result<Value, DecodeError> {
    raw.split(',')
        .map(str::trim)
        .map(|token| match kind {
            ElementKind::Str => Ok(Value::Str(token.to_string())),
            ElementKind::Int(kind) => parse_int(kind, token).map(Value::Int),
            ElementKind::Float(kind) => parse_float(kind, token).map(Value::Float),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::List)
}
