//! Declared value types of routine parameters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marker appended to a type name when the parameter is passed by reference
pub const BY_REF_MARKER: char = '&';

/// Target type a backend value can be coerced to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    String,
    Bytes,
    Uuid,
    Date,
    Time,
    DateTime,
    DateTimeUtc,
    Json,
    /// No coercion, the raw backend value is kept
    Any,
}

impl ValueType {
    /// Canonical name, as accepted by `FromStr`
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Bool => "Bool",
            ValueType::Int8 => "Int8",
            ValueType::Int16 => "Int16",
            ValueType::Int32 => "Int32",
            ValueType::Int64 => "Int64",
            ValueType::Float32 => "Float32",
            ValueType::Float64 => "Float64",
            ValueType::Decimal => "Decimal",
            ValueType::String => "String",
            ValueType::Bytes => "Bytes",
            ValueType::Uuid => "Uuid",
            ValueType::Date => "Date",
            ValueType::Time => "Time",
            ValueType::DateTime => "DateTime",
            ValueType::DateTimeUtc => "DateTimeUtc",
            ValueType::Json => "Json",
            ValueType::Any => "Any",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a type name cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown type name `{0}`")]
pub struct UnknownTypeName(pub String);

impl FromStr for ValueType {
    type Err = UnknownTypeName;

    /// Parse a type name, ignoring case
    ///
    /// Besides the canonical names, common SQL and Rust spellings are accepted
    /// so catalogs can be written with the backend's own vocabulary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s.trim().to_ascii_lowercase().as_str() {
            "bool" | "boolean" | "bit" => ValueType::Bool,
            "int8" | "i8" | "tinyint" => ValueType::Int8,
            "int16" | "i16" | "smallint" => ValueType::Int16,
            "int32" | "i32" | "int" | "integer" => ValueType::Int32,
            "int64" | "i64" | "bigint" | "long" => ValueType::Int64,
            "float32" | "f32" | "real" | "float" => ValueType::Float32,
            "float64" | "f64" | "double" | "double precision" => ValueType::Float64,
            "decimal" | "numeric" | "money" => ValueType::Decimal,
            "string" | "text" | "varchar" | "char" | "nvarchar" => ValueType::String,
            "bytes" | "blob" | "binary" | "varbinary" | "bytea" => ValueType::Bytes,
            "uuid" | "uniqueidentifier" => ValueType::Uuid,
            "date" => ValueType::Date,
            "time" => ValueType::Time,
            "datetime" | "timestamp" => ValueType::DateTime,
            "datetimeutc" | "timestamptz" | "datetimeoffset" => ValueType::DateTimeUtc,
            "json" | "jsonb" => ValueType::Json,
            "any" | "object" => ValueType::Any,
            _ => return Err(UnknownTypeName(s.to_string())),
        };
        Ok(ty)
    }
}

/// Declared type of a routine parameter
///
/// The textual form is a type name optionally followed by the by-reference
/// marker, e.g. `Int32&`. By-reference parameters are the ones a backend may
/// write back into.
///
/// # Examples
///
/// ```
/// use dbcall_core::{DeclaredType, ValueType};
///
/// let ty: DeclaredType = "Int32&".parse().unwrap();
/// assert!(ty.is_by_ref());
/// assert_eq!(ty.value_type(), ValueType::Int32);
/// assert_eq!(ty.to_string(), "Int32&");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeclaredType {
    value_type: ValueType,
    by_ref: bool,
}

impl DeclaredType {
    /// A plain value type
    pub fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            by_ref: false,
        }
    }

    /// A by-reference type
    pub fn by_ref(value_type: ValueType) -> Self {
        Self {
            value_type,
            by_ref: true,
        }
    }

    /// Underlying value type with the by-reference marker stripped
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Check if the type carries the by-reference marker
    pub fn is_by_ref(&self) -> bool {
        self.by_ref
    }
}

impl From<ValueType> for DeclaredType {
    fn from(value_type: ValueType) -> Self {
        Self::new(value_type)
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.by_ref {
            write!(f, "{}{}", self.value_type, BY_REF_MARKER)
        } else {
            write!(f, "{}", self.value_type)
        }
    }
}

impl FromStr for DeclaredType {
    type Err = UnknownTypeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.strip_suffix(BY_REF_MARKER) {
            Some(base) => Ok(Self::by_ref(base.parse()?)),
            None => Ok(Self::new(trimmed.parse()?)),
        }
    }
}

impl TryFrom<String> for DeclaredType {
    type Error = UnknownTypeName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeclaredType> for String {
    fn from(value: DeclaredType) -> Self {
        value.to_string()
    }
}
