//! SQL literal formatting.
//!
//! Pure mapping from a cell value to the literal text embedded in a
//! generated statement. Each kind carries its own quoting rule, and a wrong
//! rule corrupts the script silently (the bug only surfaces when the script
//! is replayed), so dispatch is an exhaustive match over the value enum:
//! adding a kind without a formatting rule is a compile error.

use std::fmt::Write as _;

use rust_decimal::prelude::ToPrimitive;

use crate::core::value::ScriptValue;

/// Format a single cell value as a SQL literal.
///
/// Never fails: every value in every kind's domain produces a literal.
/// NULL markers render as unquoted `NULL` regardless of the column's
/// declared kind.
pub fn sql_literal(value: &ScriptValue<'_>) -> String {
    match value {
        ScriptValue::Null => "NULL".to_string(),
        ScriptValue::Bool(v) => if *v { "1" } else { "0" }.to_string(),
        ScriptValue::I16(v) => v.to_string(),
        ScriptValue::I32(v) => v.to_string(),
        ScriptValue::I64(v) => v.to_string(),
        // Floats render through f64: Rust's Display is locale-invariant
        // (`.` separator, no grouping) and shortest-round-trip, so no
        // trailing zeros beyond what double precision requires.
        ScriptValue::F32(v) => f64::from(*v).to_string(),
        ScriptValue::F64(v) => v.to_string(),
        ScriptValue::Decimal(v) => match v.to_f64() {
            Some(f) if f.is_finite() => f.to_string(),
            // Out of double range: the decimal's own rendering is still a
            // valid numeric literal.
            _ => v.to_string(),
        },
        ScriptValue::Text(s) => quote_text(s),
        ScriptValue::Bytes(b) => hex_literal(b),
        ScriptValue::Uuid(u) => format!("'{}'", u),
        ScriptValue::DateTime(dt) => format!("'{}'", dt.format("%Y-%m-%d %H:%M:%S%.3f")),
    }
}

/// Single-quote a string, doubling every embedded quote. No other escaping.
fn quote_text(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// `0x`-prefixed uppercase hex, no separators.
///
/// An empty byte sequence is a present-but-empty value: it renders as `0x`,
/// not NULL.
fn hex_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for b in bytes {
        let _ = write!(out, "{:02X}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_null_is_unquoted_null() {
        assert_eq!(sql_literal(&ScriptValue::Null), "NULL");
    }

    #[test]
    fn test_bool_renders_as_bit() {
        assert_eq!(sql_literal(&ScriptValue::Bool(true)), "1");
        assert_eq!(sql_literal(&ScriptValue::Bool(false)), "0");
    }

    #[test]
    fn test_integers_unquoted() {
        assert_eq!(sql_literal(&ScriptValue::I16(-7)), "-7");
        assert_eq!(sql_literal(&ScriptValue::I32(42)), "42");
        assert_eq!(sql_literal(&ScriptValue::I64(9_000_000_000)), "9000000000");
    }

    #[test]
    fn test_text_quoting() {
        assert_eq!(sql_literal(&"hello".into()), "'hello'");
        // Empty string is a value, not NULL.
        assert_eq!(sql_literal(&ScriptValue::Text(Cow::Borrowed(""))), "''");
    }

    #[test]
    fn test_text_quote_escaping() {
        // zero, one, many embedded quotes, including at the boundaries
        assert_eq!(sql_literal(&"O'Brien".into()), "'O''Brien'");
        assert_eq!(sql_literal(&"'".into()), "''''");
        assert_eq!(sql_literal(&"'a'b'".into()), "'''a''b'''");
    }

    #[test]
    fn test_text_escaping_round_trips() {
        let original = "it's a 'test' string'";
        let literal = sql_literal(&original.into());
        let inner = &literal[1..literal.len() - 1];

        let n = original.matches('\'').count();
        assert_eq!(inner.matches('\'').count(), 2 * n);
        assert_eq!(inner.replace("''", "'"), original);
    }

    #[test]
    fn test_datetime_fixed_width() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_milli_opt(3, 4, 5, 6)
            .unwrap();
        assert_eq!(sql_literal(&dt.into()), "'2024-01-02 03:04:05.006'");
    }

    #[test]
    fn test_datetime_millis_truncated_to_three_digits() {
        let dt = NaiveDate::from_ymd_opt(2024, 12, 31)
            .unwrap()
            .and_hms_micro_opt(23, 59, 59, 999_999)
            .unwrap();
        assert_eq!(sql_literal(&dt.into()), "'2024-12-31 23:59:59.999'");
    }

    #[test]
    fn test_float_invariant_rendering() {
        assert_eq!(sql_literal(&ScriptValue::F64(3.25)), "3.25");
        assert_eq!(sql_literal(&ScriptValue::F64(-0.5)), "-0.5");
        // Shortest round-trip: no forced trailing zeros.
        assert_eq!(sql_literal(&ScriptValue::F64(10.0)), "10");
        assert_eq!(sql_literal(&ScriptValue::F32(1.5)), "1.5");
    }

    #[test]
    fn test_decimal_renders_through_double() {
        assert_eq!(
            sql_literal(&ScriptValue::Decimal(Decimal::new(12345, 2))),
            "123.45"
        );
        assert_eq!(
            sql_literal(&ScriptValue::Decimal(Decimal::new(-5, 1))),
            "-0.5"
        );
    }

    #[test]
    fn test_uuid_quoted_canonical() {
        assert_eq!(
            sql_literal(&ScriptValue::Uuid(Uuid::nil())),
            "'00000000-0000-0000-0000-000000000000'"
        );
    }

    #[test]
    fn test_binary_uppercase_hex() {
        assert_eq!(
            sql_literal(&ScriptValue::bytes_owned(vec![0xDE, 0xAD])),
            "0xDEAD"
        );
        assert_eq!(
            sql_literal(&ScriptValue::bytes_owned(vec![0x00, 0x0F, 0xFF])),
            "0x000FFF"
        );
    }

    #[test]
    fn test_empty_binary_is_prefix_only() {
        assert_eq!(sql_literal(&ScriptValue::bytes_owned(Vec::new())), "0x");
    }

    #[test]
    fn test_nonfinite_floats_still_produce_a_literal() {
        // Formatting must never fail, even outside SQL's numeric domain.
        assert_eq!(sql_literal(&ScriptValue::F64(f64::NAN)), "NaN");
        assert_eq!(sql_literal(&ScriptValue::F64(f64::INFINITY)), "inf");
    }
}
