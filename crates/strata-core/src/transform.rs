//! Value transforms applied at the read boundary.
//!
//! A transform turns a raw [`Value`] into the value callers see. It runs every
//! time an option is read and is never stored, so it must be pure.

use std::fmt;
use std::rc::Rc;

use crate::value::Value;

/// Failure reason returned by a transform.
pub type TransformResult = std::result::Result<Value, String>;

/// A shared, cloneable transform function.
#[derive(Clone)]
pub struct Transform(Rc<dyn Fn(Value) -> TransformResult>);

impl Transform {
    pub fn new(f: impl Fn(Value) -> TransformResult + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn apply(&self, value: Value) -> TransformResult {
        (self.0)(value)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

/// Parse strings as base-10 integers; integers pass through and floats are
/// truncated when they fit.
pub fn parse_int(value: Value) -> TransformResult {
    match value {
        Value::Int(n) => Ok(Value::Int(n)),
        Value::Bool(b) => Ok(Value::Int(i64::from(b))),
        Value::Float(n) => {
            let truncated = n.trunc();
            // i64::MAX as f64 rounds up to 2^63, which is already out of range.
            if truncated.is_finite()
                && truncated >= i64::MIN as f64
                && truncated < i64::MAX as f64
            {
                Ok(Value::Int(truncated as i64))
            } else {
                Err(format!("cannot convert float {n} to an integer"))
            }
        }
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| format!("invalid integer {s:?}: {e}")),
        Value::Null => Err("cannot convert null to an integer".to_string()),
    }
}

/// Parse strings as floating point numbers; numbers pass through.
pub fn parse_float(value: Value) -> TransformResult {
    match value {
        Value::Float(n) => Ok(Value::Float(n)),
        Value::Int(n) => Ok(Value::Float(n as f64)),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| format!("invalid float {s:?}: {e}")),
        other => Err(format!("cannot convert {} to a float", other.kind())),
    }
}

/// Parse the INI boolean words: `1/yes/true/on` and `0/no/false/off`.
pub fn parse_bool(value: Value) -> TransformResult {
    match value {
        Value::Bool(b) => Ok(Value::Bool(b)),
        Value::Int(0) => Ok(Value::Bool(false)),
        Value::Int(1) => Ok(Value::Bool(true)),
        Value::Str(s) => match s.to_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => Ok(Value::Bool(true)),
            "0" | "no" | "false" | "off" => Ok(Value::Bool(false)),
            _ => Err(format!("not a boolean: {s:?}")),
        },
        other => Err(format!("cannot convert {} to a boolean", other.kind())),
    }
}

/// Strip surrounding whitespace from strings.
pub fn trim(value: Value) -> TransformResult {
    match value {
        Value::Str(s) => Ok(Value::Str(s.trim().to_string())),
        other => Ok(other),
    }
}

/// Lowercase strings.
pub fn lowercase(value: Value) -> TransformResult {
    match value {
        Value::Str(s) => Ok(Value::Str(s.to_lowercase())),
        other => Ok(other),
    }
}
