//! Payload codec
//!
//! Payloads are stored as JSON text. Decoding walks the text as raw JSON
//! fragments so every number is settled from its exact literal:
//!
//! | Literal | Result |
//! |---------|--------|
//! | parses as `i64` | `Value::Int` |
//! | otherwise parses as a finite `f64` | `Value::Float` |
//! | otherwise (e.g. `1e400`) | `Value::String` with the literal unchanged |
//!
//! The stored text does not remember which variant a number came from, so
//! every decode path in this crate applies these rules. [`normalize`] does
//! the same for a tree that was already parsed by serde_json; there the
//! literal is serde_json's spelling of it (`1e+400`).

use crate::error::{CodecError, Result};
use crate::value::{Map, Value};
use serde::Serialize;
use serde_json::value::RawValue;
use std::collections::BTreeMap;
use std::io::Read;

/// Encode any serializable value as compact JSON text.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Decode a payload whose top level must be a JSON object.
pub fn decode(text: &str) -> Result<Map> {
    let raw: &RawValue = serde_json::from_str(text)?;
    into_object(decode_raw(raw)?)
}

/// Streaming variant of [`decode`].
pub fn decode_reader<R: Read>(reader: R) -> Result<Map> {
    let raw: Box<RawValue> = serde_json::from_reader(reader).map_err(|e| {
        if e.is_io() {
            CodecError::Io(e.into())
        } else {
            CodecError::Json(e)
        }
    })?;
    into_object(decode_raw(&raw)?)
}

/// Decode a payload of any shape.
pub fn decode_value(text: &str) -> Result<Value> {
    let raw: &RawValue = serde_json::from_str(text)?;
    decode_raw(raw)
}

/// Replace every ambiguous number in a generically decoded tree.
///
/// Recurses through arrays and objects; strings, booleans and null pass
/// through untouched.
pub fn normalize(raw: serde_json::Value) -> Value {
    match raw {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => number_literal(&n.to_string()),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        serde_json::Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k, normalize(v)))
                .collect(),
        ),
    }
}

/// Decode one well-formed JSON fragment, descending into containers.
fn decode_raw(raw: &RawValue) -> Result<Value> {
    let text = raw.get().trim_start();
    Ok(match text.as_bytes().first() {
        Some(b'{') => {
            let fields: BTreeMap<String, &RawValue> = serde_json::from_str(text)?;
            Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| Ok((k, decode_raw(v)?)))
                    .collect::<Result<Map>>()?,
            )
        }
        Some(b'[') => {
            let items: Vec<&RawValue> = serde_json::from_str(text)?;
            Value::Array(items.into_iter().map(decode_raw).collect::<Result<_>>()?)
        }
        Some(b'-' | b'0'..=b'9') => number_literal(text.trim_end()),
        _ => normalize(serde_json::from_str(text)?),
    })
}

fn number_literal(literal: &str) -> Value {
    if let Ok(i) = literal.parse::<i64>() {
        return Value::Int(i);
    }
    match literal.parse::<f64>() {
        Ok(f) if f.is_finite() => Value::Float(f),
        _ => Value::String(literal.to_string()),
    }
}

fn into_object(raw: Value) -> Result<Map> {
    match raw {
        Value::Object(map) => Ok(map),
        other => Err(CodecError::NotAnObject {
            found: other.type_name(),
        }),
    }
}
