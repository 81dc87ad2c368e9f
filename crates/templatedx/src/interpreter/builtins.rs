//! Built-in filters.
//!
//! Filters that expect a particular subject type return any other subject
//! unchanged. Extra arguments are checked strictly.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

use crate::interpreter::EvalError;
use crate::interpreter::filters::FilterFn;
use crate::types::Value;

/// The built-in filters, keyed by name.
pub(crate) fn builtin_filters() -> HashMap<String, FilterFn> {
    let filters: [(&str, FilterFn); 10] = [
        ("capitalize", Arc::new(capitalize)),
        ("upper", Arc::new(upper)),
        ("lower", Arc::new(lower)),
        ("truncate", Arc::new(truncate)),
        ("abs", Arc::new(abs)),
        ("join", Arc::new(join)),
        ("round", Arc::new(round)),
        ("replace", Arc::new(replace)),
        ("urlencode", Arc::new(urlencode)),
        ("dump", Arc::new(dump)),
    ];
    filters
        .into_iter()
        .map(|(name, filter)| (name.to_string(), filter))
        .collect()
}

/// Uppercase the first character, leaving the rest unchanged.
fn capitalize(value: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    let Value::String(text) = value else {
        return Ok(value.clone());
    };
    let mut graphemes = text.graphemes(true);
    Ok(Value::String(match graphemes.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), graphemes.as_str()),
        None => String::new(),
    }))
}

fn upper(value: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    Ok(match value {
        Value::String(text) => Value::String(text.to_uppercase()),
        other => other.clone(),
    })
}

fn lower(value: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    Ok(match value {
        Value::String(text) => Value::String(text.to_lowercase()),
        other => other.clone(),
    })
}

/// `truncate(text, length)`: cut to `length` characters and append `...`.
fn truncate(value: &Value, args: &[Value]) -> Result<Value, EvalError> {
    let length = integer_arg("truncate", args.first(), "length")?;
    let Value::String(text) = value else {
        return Ok(value.clone());
    };
    let limit = usize::try_from(length).unwrap_or(0);
    if text.chars().count() <= limit {
        return Ok(value.clone());
    }
    let mut truncated: String = text.chars().take(limit).collect();
    truncated.push_str("...");
    Ok(Value::String(truncated))
}

fn abs(value: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    Ok(match value {
        Value::Number(n) => n
            .checked_abs()
            .map_or(Value::Float((*n as f64).abs()), Value::Number),
        Value::Float(n) => Value::Float(n.abs()),
        other => other.clone(),
    })
}

/// `join(list, separator = ", ")`.
fn join(value: &Value, args: &[Value]) -> Result<Value, EvalError> {
    let separator = match args.first() {
        None => ", ".to_string(),
        Some(Value::String(separator)) => separator.clone(),
        Some(other) => {
            return Err(EvalError::filter_argument(
                "join",
                format!("separator must be a string, got {}", other.type_name()),
            ));
        }
    };
    let Value::List(items) = value else {
        return Ok(value.clone());
    };
    let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
    Ok(Value::String(parts.join(&separator)))
}

/// `round(number, decimals = 0)`, rounding halves to the nearest even digit.
///
/// With zero decimals the result is an integer.
fn round(value: &Value, args: &[Value]) -> Result<Value, EvalError> {
    let decimals = match args.first() {
        None => 0,
        argument => integer_arg("round", argument, "decimals")?,
    };
    let Some(number) = value.as_float() else {
        return Ok(value.clone());
    };
    if decimals == 0 {
        return Ok(integral(number.round_ties_even()));
    }
    let exponent = i32::try_from(decimals)
        .map_err(|_| EvalError::filter_argument("round", "decimals out of range"))?;
    let scale = 10_f64.powi(exponent);
    Ok(Value::Float((number * scale).round_ties_even() / scale))
}

/// `replace(text, search, replacement)`, replacing every occurrence.
fn replace(value: &Value, args: &[Value]) -> Result<Value, EvalError> {
    let search = string_arg("replace", args.first(), "search")?;
    let replacement = string_arg("replace", args.get(1), "replacement")?;
    Ok(match value {
        Value::String(text) => Value::String(text.replace(search, replacement)),
        other => other.clone(),
    })
}

/// Percent-encode everything except `A-Z a-z 0-9 _ . - ~`.
fn urlencode(value: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    let Value::String(text) = value else {
        return Ok(value.clone());
    };
    let mut encoded = String::with_capacity(text.len());
    for byte in text.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'.' | b'-' | b'~') {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    Ok(Value::String(encoded))
}

/// Serialize any value as compact JSON.
fn dump(value: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::String(value.to_json_string()))
}

fn integer_arg(filter: &str, argument: Option<&Value>, name: &str) -> Result<i64, EvalError> {
    match argument {
        Some(Value::Number(n)) => Ok(*n),
        Some(Value::Float(n)) if n.fract() == 0.0 && n.is_finite() => Ok(*n as i64),
        Some(other) => Err(EvalError::filter_argument(
            filter,
            format!("{name} must be an integer, got {}", other.type_name()),
        )),
        None => Err(EvalError::filter_argument(
            filter,
            format!("missing argument '{name}'"),
        )),
    }
}

fn string_arg<'v>(
    filter: &str,
    argument: Option<&'v Value>,
    name: &str,
) -> Result<&'v str, EvalError> {
    match argument {
        Some(Value::String(text)) => Ok(text),
        Some(other) => Err(EvalError::filter_argument(
            filter,
            format!("{name} must be a string, got {}", other.type_name()),
        )),
        None => Err(EvalError::filter_argument(
            filter,
            format!("missing argument '{name}'"),
        )),
    }
}

/// A rounded float as an integer value when it fits.
fn integral(number: f64) -> Value {
    const LIMIT: f64 = 9_223_372_036_854_775_807.0;
    if number.is_finite() && number.abs() < LIMIT {
        Value::Number(number as i64)
    } else {
        Value::Float(number)
    }
}
