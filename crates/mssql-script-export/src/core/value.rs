//! Cell value types for script generation.
//!
//! A fetched table cell is represented as a tagged variant so literal
//! formatting can dispatch exhaustively over the closed set of kinds.

use std::borrow::Cow;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

/// A single table cell, either a typed value or the NULL marker.
///
/// `Null` is a sentinel distinct from every in-domain value: an empty string
/// is a `Text` cell, an empty byte sequence is a `Bytes` cell, and neither
/// renders as `NULL`.
///
/// Uses `Cow` for string and byte data to enable zero-copy conversion when
/// borrowing from source buffers.
///
/// # Example
///
/// ```rust
/// use std::borrow::Cow;
/// use mssql_script_export::core::ScriptValue;
///
/// let borrowed: ScriptValue<'_> = ScriptValue::Text(Cow::Borrowed("hello"));
/// let owned: ScriptValue<'static> = borrowed.into_owned();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue<'a> {
    /// The NULL marker, regardless of the column's declared kind.
    Null,

    /// Boolean value (bit).
    Bool(bool),

    /// 16-bit signed integer (smallint, widened tinyint).
    I16(i16),

    /// 32-bit signed integer (int).
    I32(i32),

    /// 64-bit signed integer (bigint).
    I64(i64),

    /// 32-bit floating point (real).
    F32(f32),

    /// 64-bit floating point (float).
    F64(f64),

    /// Fixed-point decimal (decimal, numeric, money).
    Decimal(Decimal),

    /// Text data with zero-copy support.
    Text(Cow<'a, str>),

    /// Binary data with zero-copy support.
    Bytes(Cow<'a, [u8]>),

    /// UUID/GUID value (uniqueidentifier).
    Uuid(Uuid),

    /// Timestamp without timezone.
    DateTime(NaiveDateTime),
}

impl<'a> ScriptValue<'a> {
    /// Convert to a fully owned value with `'static` lifetime.
    #[must_use]
    pub fn into_owned(self) -> ScriptValue<'static> {
        match self {
            ScriptValue::Null => ScriptValue::Null,
            ScriptValue::Bool(v) => ScriptValue::Bool(v),
            ScriptValue::I16(v) => ScriptValue::I16(v),
            ScriptValue::I32(v) => ScriptValue::I32(v),
            ScriptValue::I64(v) => ScriptValue::I64(v),
            ScriptValue::F32(v) => ScriptValue::F32(v),
            ScriptValue::F64(v) => ScriptValue::F64(v),
            ScriptValue::Decimal(v) => ScriptValue::Decimal(v),
            ScriptValue::Text(v) => ScriptValue::Text(Cow::Owned(v.into_owned())),
            ScriptValue::Bytes(v) => ScriptValue::Bytes(Cow::Owned(v.into_owned())),
            ScriptValue::Uuid(v) => ScriptValue::Uuid(v),
            ScriptValue::DateTime(v) => ScriptValue::DateTime(v),
        }
    }

    /// Check if this value is the NULL marker.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, ScriptValue::Null)
    }

    /// Create a text value from an owned String.
    #[must_use]
    pub fn text_owned(s: String) -> ScriptValue<'static> {
        ScriptValue::Text(Cow::Owned(s))
    }

    /// Create a bytes value from an owned Vec<u8>.
    #[must_use]
    pub fn bytes_owned(b: Vec<u8>) -> ScriptValue<'static> {
        ScriptValue::Bytes(Cow::Owned(b))
    }
}

impl From<bool> for ScriptValue<'static> {
    fn from(v: bool) -> Self {
        ScriptValue::Bool(v)
    }
}

impl From<i16> for ScriptValue<'static> {
    fn from(v: i16) -> Self {
        ScriptValue::I16(v)
    }
}

impl From<i32> for ScriptValue<'static> {
    fn from(v: i32) -> Self {
        ScriptValue::I32(v)
    }
}

impl From<i64> for ScriptValue<'static> {
    fn from(v: i64) -> Self {
        ScriptValue::I64(v)
    }
}

impl From<f64> for ScriptValue<'static> {
    fn from(v: f64) -> Self {
        ScriptValue::F64(v)
    }
}

impl From<String> for ScriptValue<'static> {
    fn from(v: String) -> Self {
        ScriptValue::Text(Cow::Owned(v))
    }
}

impl<'a> From<&'a str> for ScriptValue<'a> {
    fn from(v: &'a str) -> Self {
        ScriptValue::Text(Cow::Borrowed(v))
    }
}

impl From<Vec<u8>> for ScriptValue<'static> {
    fn from(v: Vec<u8>) -> Self {
        ScriptValue::Bytes(Cow::Owned(v))
    }
}

impl From<Uuid> for ScriptValue<'static> {
    fn from(v: Uuid) -> Self {
        ScriptValue::Uuid(v)
    }
}

impl From<Decimal> for ScriptValue<'static> {
    fn from(v: Decimal) -> Self {
        ScriptValue::Decimal(v)
    }
}

impl From<NaiveDateTime> for ScriptValue<'static> {
    fn from(v: NaiveDateTime) -> Self {
        ScriptValue::DateTime(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_owned() {
        let borrowed: ScriptValue<'_> = ScriptValue::Text(Cow::Borrowed("hello"));
        let owned: ScriptValue<'static> = borrowed.into_owned();
        assert_eq!(owned, ScriptValue::Text(Cow::Owned("hello".to_string())));
    }

    #[test]
    fn test_is_null() {
        assert!(ScriptValue::Null.is_null());
        assert!(!ScriptValue::I32(42).is_null());
        // The distinction the formatter relies on: empty != NULL.
        assert!(!ScriptValue::text_owned(String::new()).is_null());
        assert!(!ScriptValue::bytes_owned(Vec::new()).is_null());
    }

    #[test]
    fn test_from_implementations() {
        let v: ScriptValue<'static> = 42i32.into();
        assert_eq!(v, ScriptValue::I32(42));

        let v: ScriptValue<'static> = "hello".to_string().into();
        assert_eq!(v, ScriptValue::Text(Cow::Owned("hello".to_string())));

        let v: ScriptValue<'static> = vec![0xDEu8, 0xAD].into();
        assert_eq!(v, ScriptValue::Bytes(Cow::Owned(vec![0xDE, 0xAD])));
    }
}
