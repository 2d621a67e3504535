//! Type checking and coercion of option values.
//!
//! [`validate`] and [`conform`] guard every mutation of the registry.
//! [`cast`] is only used when values arrive from a text format (YAML, JSON,
//! TOML), where numbers and booleans may be written loosely.

use std::path::PathBuf;

use serde_value::Value;

use crate::{
    error::Error,
    value::{OptionKind, OptionValue},
};

/// Checks that `value` conforms to `kind`.
///
/// Text is accepted for the path kinds. An input path that is set must exist
/// as a file or a directory, otherwise [`Error::PathNotFound`] is returned.
/// Unset input paths pass; whether they may be read is decided by the
/// registry.
pub fn validate(value: &OptionValue, kind: OptionKind) -> Result<(), Error> {
    match (kind, value) {
        (OptionKind::Int, OptionValue::Int(_))
        | (OptionKind::Float, OptionValue::Float(_))
        | (OptionKind::Bool, OptionValue::Bool(_))
        | (OptionKind::Text | OptionKind::String, OptionValue::Text(_)) => Ok(()),
        (OptionKind::PathIn, OptionValue::Path(None)) => Ok(()),
        (OptionKind::PathIn, OptionValue::Path(Some(path))) => check_exists(path.clone()),
        (OptionKind::PathIn, OptionValue::Text(text)) => check_exists(PathBuf::from(text)),
        (OptionKind::PathOut, OptionValue::Path(Some(_)) | OptionValue::Text(_)) => Ok(()),
        (kind, value) => Err(Error::type_mismatch(kind, value)),
    }
}

/// Validates `value` against `kind` and returns it in its stored form.
///
/// Text given to a path kind becomes a path; empty text becomes an unset
/// path.
pub fn conform(value: OptionValue, kind: OptionKind) -> Result<OptionValue, Error> {
    let value = match (kind.is_path(), value) {
        (true, OptionValue::Text(text)) if text.is_empty() => OptionValue::Path(None),
        (true, OptionValue::Text(text)) => OptionValue::Path(Some(PathBuf::from(text))),
        (true, OptionValue::Path(Some(path))) if path.as_os_str().is_empty() => {
            OptionValue::Path(None)
        }
        (_, value) => value,
    };
    validate(&value, kind)?;
    Ok(value)
}

/// Converts a loosely typed value read from a file into a native value.
///
/// The result still has to go through [`conform`] before it is stored.
pub fn cast(raw: Value, kind: OptionKind) -> Result<OptionValue, Error> {
    let raw = unwrap(raw);
    match kind {
        OptionKind::Bool => cast_bool(raw),
        OptionKind::Int => cast_int(raw),
        OptionKind::Float => cast_float(raw),
        OptionKind::Text | OptionKind::String => match raw {
            Value::String(s) => Ok(OptionValue::Text(s)),
            Value::Char(c) => Ok(OptionValue::Text(c.to_string())),
            other => Err(mismatch(kind, &other)),
        },
        OptionKind::PathIn | OptionKind::PathOut => match raw {
            Value::String(s) if s.is_empty() => Ok(OptionValue::Path(None)),
            Value::String(s) => Ok(OptionValue::Path(Some(PathBuf::from(s)))),
            Value::Unit | Value::Option(None) => Ok(OptionValue::Path(None)),
            other => Err(mismatch(kind, &other)),
        },
    }
}

fn check_exists(path: PathBuf) -> Result<(), Error> {
    if path.as_os_str().is_empty() || path.is_file() || path.is_dir() {
        Ok(())
    } else {
        Err(Error::PathNotFound(path))
    }
}

fn unwrap(raw: Value) -> Value {
    match raw {
        Value::Option(Some(inner)) | Value::Newtype(inner) => unwrap(*inner),
        other => other,
    }
}

fn as_i128(raw: &Value) -> Option<i128> {
    match *raw {
        Value::U8(v) => Some(v.into()),
        Value::U16(v) => Some(v.into()),
        Value::U32(v) => Some(v.into()),
        Value::U64(v) => Some(v.into()),
        Value::I8(v) => Some(v.into()),
        Value::I16(v) => Some(v.into()),
        Value::I32(v) => Some(v.into()),
        Value::I64(v) => Some(v.into()),
        _ => None,
    }
}

fn cast_bool(raw: Value) -> Result<OptionValue, Error> {
    if let Some(n) = as_i128(&raw) {
        return Ok(OptionValue::Bool(n != 0));
    }
    match raw {
        Value::Bool(b) => Ok(OptionValue::Bool(b)),
        Value::String(ref s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(OptionValue::Bool(true)),
            "false" | "no" | "off" | "0" => Ok(OptionValue::Bool(false)),
            _ => Err(mismatch(OptionKind::Bool, &raw)),
        },
        other => Err(mismatch(OptionKind::Bool, &other)),
    }
}

fn cast_int(raw: Value) -> Result<OptionValue, Error> {
    if let Some(n) = as_i128(&raw) {
        return i64::try_from(n)
            .map(OptionValue::Int)
            .map_err(|_| mismatch(OptionKind::Int, &raw));
    }
    match raw {
        Value::F32(v) => float_to_int(f64::from(v)).ok_or_else(|| mismatch(OptionKind::Int, &raw)),
        Value::F64(v) => float_to_int(v).ok_or_else(|| mismatch(OptionKind::Int, &raw)),
        Value::String(ref s) => s
            .trim()
            .parse::<i64>()
            .map(OptionValue::Int)
            .map_err(|_| mismatch(OptionKind::Int, &raw)),
        other => Err(mismatch(OptionKind::Int, &other)),
    }
}

/// Truncates `v`, refusing values that do not fit an `i64`.
fn float_to_int(v: f64) -> Option<OptionValue> {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    let v = v.trunc();
    (v.is_finite() && v >= i64::MIN as f64 && v < i64::MAX as f64).then(|| OptionValue::Int(v as i64))
}

fn cast_float(raw: Value) -> Result<OptionValue, Error> {
    if let Some(n) = as_i128(&raw) {
        return Ok(OptionValue::Float(n as f64));
    }
    match raw {
        Value::F32(v) => Ok(OptionValue::Float(f64::from(v))),
        Value::F64(v) => Ok(OptionValue::Float(v)),
        Value::String(ref s) => s
            .trim()
            .parse::<f64>()
            .map(OptionValue::Float)
            .map_err(|_| mismatch(OptionKind::Float, &raw)),
        other => Err(mismatch(OptionKind::Float, &other)),
    }
}

fn mismatch(kind: OptionKind, raw: &Value) -> Error {
    Error::type_mismatch(kind, format!("{raw:?}"))
}
