//! Dynamic values moved between properties and columns.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Fallback pattern used when neither the field nor the connection supplies one.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A property or column value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::DateTime(_) => "datetime",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Loose truthiness: empty strings, `"0"`, zero numbers and empty
    /// collections are false.
    pub fn truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0 && !f.is_nan(),
            Self::String(s) => !s.is_empty() && s != "0",
            Self::Array(items) => !items.is_empty(),
            Self::Map(entries) => !entries.is_empty(),
            Self::DateTime(_) => true,
        }
    }

    /// Integer coercion. Strings use their leading numeric part, anything
    /// unparseable becomes zero.
    pub fn coerce_i64(&self) -> i64 {
        match self {
            Self::Null => 0,
            Self::Bool(b) => i64::from(*b),
            Self::Int(i) => *i,
            Self::Float(f) => float_to_i64(*f),
            Self::String(s) => {
                let number = leading_number(s);
                number
                    .parse::<i64>()
                    .unwrap_or_else(|_| number.parse::<f64>().map(float_to_i64).unwrap_or(0))
            }
            Self::Array(_) | Self::Map(_) => i64::from(self.truthy()),
            Self::DateTime(dt) => dt.and_utc().timestamp(),
        }
    }

    /// Float coercion, same leniency as [`Value::coerce_i64`].
    pub fn coerce_f64(&self) -> f64 {
        match self {
            Self::Float(f) => *f,
            Self::Int(i) => *i as f64,
            Self::String(s) => leading_number(s).parse::<f64>().unwrap_or(0.0),
            Self::DateTime(dt) => dt.and_utc().timestamp() as f64,
            other => other.coerce_i64() as f64,
        }
    }

    /// String coercion. Collections are rendered as JSON.
    pub fn coerce_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(true) => "1".to_string(),
            Self::Bool(false) => String::new(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s) => s.clone(),
            Self::Array(_) | Self::Map(_) => self.to_json().to_string(),
            Self::DateTime(dt) => dt.format(DEFAULT_DATE_FORMAT).to_string(),
        }
    }

    /// Converts into a JSON value. Date-times use [`DEFAULT_DATE_FORMAT`].
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Array(items) => items.iter().map(Value::to_json).collect(),
            Self::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Self::DateTime(dt) => {
                serde_json::Value::String(dt.format(DEFAULT_DATE_FORMAT).to_string())
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(0.0)),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::String(s) => write!(f, "'{}'", s),
            other => write!(f, "{}", other.coerce_string()),
        }
    }
}

fn float_to_i64(f: f64) -> i64 {
    if f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        f.trunc() as i64
    } else {
        0
    }
}

/// Longest numeric prefix of a trimmed string (sign, digits, one dot, exponent).
fn leading_number(s: &str) -> &str {
    let trimmed = s.trim();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;

    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            b'e' | b'E' if seen_digit => {
                let exponent = &trimmed[end + 1..];
                let digits = exponent.trim_start_matches(['-', '+']);
                let sign_len = exponent.len() - digits.len();
                let digit_len = digits.bytes().take_while(u8::is_ascii_digit).count();
                if sign_len <= 1 && digit_len > 0 {
                    end += 1 + sign_len + digit_len;
                }
                break;
            }
            _ => break,
        }
        end += 1;
    }

    if seen_digit {
        &trimmed[..end]
    } else {
        ""
    }
}
