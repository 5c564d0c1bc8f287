//! Scalar coercion rules.
//!
//! A value whose native kind already matches the target is returned as is.
//! Otherwise native booleans are first turned into their text (`True`/`False`)
//! and the text is coerced, which is what keeps a boolean from ever becoming
//! `0`/`1` or `0.0`/`1.0`.

use super::bound::Bound;
use super::descriptor::Primitive;
use super::error::BindError;
use crate::value::Value;

pub fn coerce(value: &Value, target: Primitive) -> Result<Bound, BindError> {
    if let Some(bound) = native(value, target) {
        return Ok(bound);
    }

    let stringified;
    let value = match value {
        Value::Bool(_) => {
            stringified = Value::String(value.to_string());
            &stringified
        }
        other => other,
    };

    let coerced = match target {
        Primitive::Bool => to_bool(value),
        Primitive::Integer => to_integer(value),
        Primitive::Float => to_float(value),
        Primitive::Null => to_null(value),
        Primitive::String => Some(Bound::String(value.to_string())),
    };
    coerced.ok_or_else(|| BindError::coerce(value, target.name()))
}

fn native(value: &Value, target: Primitive) -> Option<Bound> {
    match (value, target) {
        (Value::Null, Primitive::Null) => Some(Bound::Null),
        (Value::Bool(b), Primitive::Bool) => Some(Bound::Bool(*b)),
        (Value::Integer(i), Primitive::Integer) => Some(Bound::Integer(*i)),
        (Value::Float(x), Primitive::Float) => Some(Bound::Float(*x)),
        (Value::String(s), Primitive::String) => Some(Bound::String(s.clone())),
        _ => None,
    }
}

fn to_bool(value: &Value) -> Option<Bound> {
    let text = value.as_str()?;
    if text.eq_ignore_ascii_case("true") {
        Some(Bound::Bool(true))
    } else if text.eq_ignore_ascii_case("false") {
        Some(Bound::Bool(false))
    } else {
        None
    }
}

fn to_integer(value: &Value) -> Option<Bound> {
    match value {
        Value::Float(x) => truncate(*x),
        Value::String(s) => {
            let text = s.trim();
            match text.parse::<i64>() {
                Ok(i) => Some(Bound::Integer(i)),
                Err(_) => truncate(text.parse::<f64>().ok()?),
            }
        }
        _ => None,
    }
}

fn truncate(x: f64) -> Option<Bound> {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    let in_range = x.is_finite() && x >= i64::MIN as f64 && x < i64::MAX as f64;
    in_range.then(|| Bound::Integer(x.trunc() as i64))
}

fn to_float(value: &Value) -> Option<Bound> {
    match value {
        Value::Integer(i) => Some(Bound::Float(*i as f64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(Bound::Float),
        _ => None,
    }
}

fn to_null(value: &Value) -> Option<Bound> {
    matches!(value.as_str().map(str::trim), Some("None")).then_some(Bound::Null)
}
