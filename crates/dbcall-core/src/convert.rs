//! Value conversion primitive
//!
//! Backends hand back output parameters in whatever representation their
//! driver chose (a NUMERIC as a decimal string, an INTEGER as i64, a DATE as
//! text). `ValueConverter` coerces such a raw value to the type a routine
//! parameter was declared with.

use crate::{Value, ValueType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// A value could not be coerced to its declared type
#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot convert {} value `{value}` to {target}: {reason}", .value.type_label())]
pub struct ConversionError {
    /// The raw value as returned by the backend
    pub value: Value,
    /// The requested target type
    pub target: ValueType,
    /// Human readable cause
    pub reason: String,
}

impl ConversionError {
    pub fn new(value: Value, target: ValueType, reason: impl Into<String>) -> Self {
        Self {
            value,
            target,
            reason: reason.into(),
        }
    }
}

/// Converts a value to a target type
pub trait ValueConverter: Send + Sync {
    /// Convert `value` to `target`, failing with a `ConversionError`
    fn convert(&self, value: &Value, target: ValueType) -> Result<Value, ConversionError>;
}

/// Default conversion rules
///
/// - `NULL` converts to `NULL` for every target
/// - `ValueType::Any` keeps the raw value
/// - Integer narrowing is range checked and fractional numbers are never
///   truncated into integers
/// - Strings are trimmed and parsed
///
/// # Examples
///
/// ```
/// use dbcall_core::{StandardConverter, Value, ValueConverter, ValueType};
///
/// let converter = StandardConverter;
/// let value = converter
///     .convert(&Value::Decimal("42.00".into()), ValueType::Int32)
///     .unwrap();
/// assert_eq!(value, Value::Int32(42));
///
/// assert!(converter
///     .convert(&Value::Decimal("42.5".into()), ValueType::Int32)
///     .is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardConverter;

impl ValueConverter for StandardConverter {
    fn convert(&self, value: &Value, target: ValueType) -> Result<Value, ConversionError> {
        if value.is_null() || target == ValueType::Any {
            return Ok(value.clone());
        }

        let converted = match target {
            ValueType::Bool => to_bool(value).map(Value::Bool),
            ValueType::Int8 => to_i64(value).and_then(narrow::<i8>).map(Value::Int8),
            ValueType::Int16 => to_i64(value).and_then(narrow::<i16>).map(Value::Int16),
            ValueType::Int32 => to_i64(value).and_then(narrow::<i32>).map(Value::Int32),
            ValueType::Int64 => to_i64(value).map(Value::Int64),
            ValueType::Float32 => to_f64(value).and_then(to_f32).map(Value::Float32),
            ValueType::Float64 => to_f64(value).map(Value::Float64),
            ValueType::Decimal => to_decimal(value).map(Value::Decimal),
            ValueType::String => to_string(value).map(Value::String),
            ValueType::Bytes => to_bytes(value).map(Value::Bytes),
            ValueType::Uuid => to_uuid(value).map(Value::Uuid),
            ValueType::Date => to_date(value).map(Value::Date),
            ValueType::Time => to_time(value).map(Value::Time),
            ValueType::DateTime => to_datetime(value).map(Value::DateTime),
            ValueType::DateTimeUtc => to_datetime_utc(value).map(Value::DateTimeUtc),
            ValueType::Json => to_json(value).map(Value::Json),
            ValueType::Any => Ok(value.clone()),
        };

        converted.map_err(|reason| ConversionError::new(value.clone(), target, reason))
    }
}

type Conversion<T> = Result<T, String>;

fn unsupported<T>(value: &Value) -> Conversion<T> {
    Err(format!("{} values are not convertible", value.type_label()))
}

fn to_bool(value: &Value) -> Conversion<bool> {
    match value {
        Value::Bool(v) => Ok(*v),
        Value::Int8(_) | Value::Int16(_) | Value::Int32(_) | Value::Int64(_) => {
            Ok(value.as_i64() != Some(0))
        }
        Value::String(s) | Value::Decimal(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "1" => Ok(true),
            "false" | "f" | "no" | "n" | "0" => Ok(false),
            other => Err(format!("`{}` is not a boolean", other)),
        },
        _ => unsupported(value),
    }
}

fn to_i64(value: &Value) -> Conversion<i64> {
    match value {
        Value::Int8(_) | Value::Int16(_) | Value::Int32(_) | Value::Int64(_) => {
            value.as_i64().ok_or_else(|| "integer expected".to_string())
        }
        Value::Bool(v) => Ok(i64::from(*v)),
        Value::Float32(_) | Value::Float64(_) => {
            let v = value.as_f64().unwrap_or(f64::NAN);
            if !v.is_finite() {
                Err(format!("{} is not finite", v))
            } else if v.fract() != 0.0 {
                Err(format!("{} has a fractional part", v))
            } else if v < i64::MIN as f64 || v >= i64::MAX as f64 {
                Err(format!("{} is out of range", v))
            } else {
                Ok(v as i64)
            }
        }
        Value::Decimal(s) | Value::String(s) => parse_integer_text(s),
        _ => unsupported(value),
    }
}

fn parse_integer_text(text: &str) -> Conversion<i64> {
    let text = text.trim();
    if let Ok(v) = text.parse::<i64>() {
        return Ok(v);
    }
    match text.split_once('.') {
        Some((whole, frac)) if frac.chars().all(|c| c == '0') => whole
            .parse::<i64>()
            .map_err(|_| format!("`{}` is not an integer", text)),
        Some(_) => Err(format!("`{}` has a fractional part", text)),
        None => Err(format!("`{}` is not an integer", text)),
    }
}

fn narrow<T: TryFrom<i64>>(v: i64) -> Conversion<T> {
    T::try_from(v).map_err(|_| format!("{} is out of range", v))
}

fn to_f64(value: &Value) -> Conversion<f64> {
    match value {
        Value::Float32(_) | Value::Float64(_) => value
            .as_f64()
            .ok_or_else(|| "float expected".to_string()),
        Value::Int8(_) | Value::Int16(_) | Value::Int32(_) | Value::Int64(_) => value
            .as_i64()
            .map(|v| v as f64)
            .ok_or_else(|| "integer expected".to_string()),
        Value::Bool(v) => Ok(if *v { 1.0 } else { 0.0 }),
        Value::Decimal(s) | Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("`{}` is not a number", s)),
        _ => unsupported(value),
    }
}

fn to_f32(v: f64) -> Conversion<f32> {
    if v.is_finite() && v.abs() > f32::MAX as f64 {
        Err(format!("{} is out of range", v))
    } else {
        Ok(v as f32)
    }
}

fn to_decimal(value: &Value) -> Conversion<String> {
    match value {
        Value::Decimal(s) => Ok(s.clone()),
        Value::Int8(_) | Value::Int16(_) | Value::Int32(_) | Value::Int64(_) => {
            Ok(value.to_string())
        }
        Value::Float32(_) | Value::Float64(_) => {
            let v = to_f64(value)?;
            if v.is_finite() {
                Ok(v.to_string())
            } else {
                Err(format!("{} is not finite", v))
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            match trimmed.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(trimmed.to_string()),
                _ => Err(format!("`{}` is not a decimal number", s)),
            }
        }
        _ => unsupported(value),
    }
}

fn to_string(value: &Value) -> Conversion<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bytes(bytes) => {
            String::from_utf8(bytes.clone()).map_err(|_| "bytes are not valid UTF-8".to_string())
        }
        Value::Json(serde_json::Value::String(s)) => Ok(s.clone()),
        Value::Array(_) => unsupported(value),
        other => Ok(other.to_string()),
    }
}

fn to_bytes(value: &Value) -> Conversion<Vec<u8>> {
    match value {
        Value::Bytes(bytes) => Ok(bytes.clone()),
        Value::String(s) => Ok(s.as_bytes().to_vec()),
        Value::Uuid(id) => Ok(id.as_bytes().to_vec()),
        _ => unsupported(value),
    }
}

fn to_uuid(value: &Value) -> Conversion<Uuid> {
    match value {
        Value::Uuid(id) => Ok(*id),
        Value::String(s) => Uuid::parse_str(s.trim()).map_err(|e| e.to_string()),
        Value::Bytes(bytes) => Uuid::from_slice(bytes).map_err(|e| e.to_string()),
        _ => unsupported(value),
    }
}

fn parse_naive_datetime(text: &str) -> Conversion<NaiveDateTime> {
    let text = text.trim();
    text.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|_| format!("`{}` is not a date-time", text))
}

fn to_date(value: &Value) -> Conversion<NaiveDate> {
    match value {
        Value::Date(d) => Ok(*d),
        Value::DateTime(dt) => Ok(dt.date()),
        Value::DateTimeUtc(dt) => Ok(dt.date_naive()),
        Value::String(s) => s
            .trim()
            .parse::<NaiveDate>()
            .or_else(|_| parse_naive_datetime(s).map(|dt| dt.date()))
            .map_err(|_| format!("`{}` is not a date", s)),
        _ => unsupported(value),
    }
}

fn to_time(value: &Value) -> Conversion<NaiveTime> {
    match value {
        Value::Time(t) => Ok(*t),
        Value::DateTime(dt) => Ok(dt.time()),
        Value::DateTimeUtc(dt) => Ok(dt.time()),
        Value::String(s) => s
            .trim()
            .parse::<NaiveTime>()
            .map_err(|_| format!("`{}` is not a time", s)),
        _ => unsupported(value),
    }
}

fn to_datetime(value: &Value) -> Conversion<NaiveDateTime> {
    match value {
        Value::DateTime(dt) => Ok(*dt),
        Value::DateTimeUtc(dt) => Ok(dt.naive_utc()),
        Value::Date(d) => d
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| format!("{} has no midnight", d)),
        Value::String(s) => parse_naive_datetime(s),
        _ => unsupported(value),
    }
}

fn to_datetime_utc(value: &Value) -> Conversion<DateTime<Utc>> {
    match value {
        Value::DateTimeUtc(dt) => Ok(*dt),
        Value::DateTime(_) | Value::Date(_) => to_datetime(value).map(|dt| dt.and_utc()),
        Value::String(s) => s
            .trim()
            .parse::<DateTime<Utc>>()
            .or_else(|_| parse_naive_datetime(s).map(|dt| dt.and_utc())),
        _ => unsupported(value),
    }
}

fn to_json(value: &Value) -> Conversion<serde_json::Value> {
    match value {
        Value::Json(v) => Ok(v.clone()),
        Value::String(s) => serde_json::from_str(s).map_err(|e| e.to_string()),
        Value::Bool(v) => Ok(serde_json::Value::Bool(*v)),
        Value::Int8(_) | Value::Int16(_) | Value::Int32(_) | Value::Int64(_) => value
            .as_i64()
            .map(serde_json::Value::from)
            .ok_or_else(|| "integer expected".to_string()),
        Value::Float32(_) | Value::Float64(_) => to_f64(value).and_then(|v| {
            serde_json::Number::from_f64(v)
                .map(serde_json::Value::Number)
                .ok_or_else(|| format!("{} is not finite", v))
        }),
        Value::Decimal(s) => serde_json::from_str::<serde_json::Number>(s.trim())
            .map(serde_json::Value::Number)
            .map_err(|e| e.to_string()),
        _ => unsupported(value),
    }
}
