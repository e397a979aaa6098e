//! Schema metadata for exported tables.
//!
//! A [`Table`] here is fully materialized: column metadata plus every row,
//! positionally aligned. The export loop fetches one table at a time, so the
//! whole result set is held in memory for the duration of one script.

use serde::{Deserialize, Serialize};

use super::value::ScriptValue;

/// Semantic kind of a column, drawn from a closed set.
///
/// Every source-side native type maps into exactly one kind; the kind decides
/// which literal formatting rule applies. Nullability is not a kind of its
/// own: it lives on [`Column::is_nullable`] and in the `Null` variant of
/// [`ScriptValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Character data, quoted and quote-escaped.
    Text,
    /// Timestamps, rendered zero-padded and locale-invariant.
    DateTime,
    /// Bit columns, rendered as `1`/`0`.
    Boolean,
    /// Floating point and fixed-point decimals, rendered through an `f64`.
    Numeric,
    /// Signed integers of any width, rendered unquoted.
    Integer,
    /// uniqueidentifier, rendered as the quoted canonical hyphenated form.
    Uuid,
    /// Raw byte sequences, rendered as `0x`-prefixed uppercase hex.
    Binary,
}

impl ColumnKind {
    /// Map an MSSQL type name (as reported by `INFORMATION_SCHEMA`) to a kind.
    ///
    /// Returns `None` for types that cannot be read back as text or any other
    /// scriptable representation; the caller fails that table's export fast.
    /// Unrecognized type names fall back to `Text`: the cell is fetched as a
    /// string and emitted quoted/escaped, preserving the data. That fallback
    /// is a policy choice, flagged by `unknown_type_falls_back_to_text` below.
    pub fn from_mssql(data_type: &str) -> Option<Self> {
        let dt = data_type.to_ascii_lowercase();
        match dt.as_str() {
            "bit" => Some(ColumnKind::Boolean),
            "tinyint" | "smallint" | "int" | "bigint" => Some(ColumnKind::Integer),
            "real" | "float" | "decimal" | "numeric" | "money" | "smallmoney" => {
                Some(ColumnKind::Numeric)
            }
            "uniqueidentifier" => Some(ColumnKind::Uuid),
            "binary" | "varbinary" | "image" | "timestamp" | "rowversion" => {
                Some(ColumnKind::Binary)
            }
            "datetime" | "datetime2" | "smalldatetime" | "date" => Some(ColumnKind::DateTime),
            // No textual round-trip without an explicit CAST; refuse rather
            // than corrupt the generated script.
            "geography" | "geometry" | "hierarchyid" | "sql_variant" => None,
            // char/varchar/nchar/nvarchar/text/ntext/xml/sysname, plus
            // datetimeoffset and time (fetched typed, carried as text
            // literals), plus anything this tool has never heard of.
            _ => Some(ColumnKind::Text),
        }
    }
}

/// Column metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within its table.
    pub name: String,

    /// Raw MSSQL data type (e.g., "int", "nvarchar", "datetime2").
    pub data_type: String,

    /// Semantic kind derived from `data_type`.
    pub kind: ColumnKind,

    /// Maximum length for string/binary types (-1 for max).
    pub max_length: i32,

    /// Whether the column allows NULL.
    pub is_nullable: bool,

    /// Ordinal position (1-based).
    pub ordinal_pos: i32,
}

/// A fully materialized table: metadata plus every row.
///
/// Invariant: every row's cell count equals the column count, in the same
/// order. The assembler enforces this before emitting any script text.
#[derive(Debug, Clone)]
pub struct Table {
    /// Source schema name (qualifies source-side SELECTs only).
    pub schema: String,

    /// Table name (becomes the script's bracket-quoted identifier).
    pub name: String,

    /// Column definitions in ordinal order.
    pub columns: Vec<Column>,

    /// Rows in source order, one cell per column.
    pub rows: Vec<Vec<ScriptValue<'static>>>,
}

impl Table {
    /// Get the fully qualified source-side table name.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Number of materialized rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping_core_types() {
        assert_eq!(ColumnKind::from_mssql("bit"), Some(ColumnKind::Boolean));
        assert_eq!(ColumnKind::from_mssql("int"), Some(ColumnKind::Integer));
        assert_eq!(ColumnKind::from_mssql("bigint"), Some(ColumnKind::Integer));
        assert_eq!(ColumnKind::from_mssql("float"), Some(ColumnKind::Numeric));
        assert_eq!(ColumnKind::from_mssql("decimal"), Some(ColumnKind::Numeric));
        assert_eq!(ColumnKind::from_mssql("nvarchar"), Some(ColumnKind::Text));
        assert_eq!(
            ColumnKind::from_mssql("uniqueidentifier"),
            Some(ColumnKind::Uuid)
        );
        assert_eq!(ColumnKind::from_mssql("varbinary"), Some(ColumnKind::Binary));
        assert_eq!(
            ColumnKind::from_mssql("datetime2"),
            Some(ColumnKind::DateTime)
        );
    }

    #[test]
    fn test_kind_mapping_is_case_insensitive() {
        assert_eq!(ColumnKind::from_mssql("INT"), Some(ColumnKind::Integer));
        assert_eq!(ColumnKind::from_mssql("NVarChar"), Some(ColumnKind::Text));
    }

    #[test]
    fn test_rowversion_is_binary() {
        // timestamp/rowversion is binary(8) despite the name.
        assert_eq!(ColumnKind::from_mssql("timestamp"), Some(ColumnKind::Binary));
        assert_eq!(
            ColumnKind::from_mssql("rowversion"),
            Some(ColumnKind::Binary)
        );
    }

    /// Policy, not accident: a type name this tool does not recognize is
    /// fetched as a string and emitted quoted, rather than failing the
    /// export. Exotic non-textual types are excluded from the fallback.
    #[test]
    fn unknown_type_falls_back_to_text() {
        assert_eq!(
            ColumnKind::from_mssql("some_future_type"),
            Some(ColumnKind::Text)
        );
        assert_eq!(ColumnKind::from_mssql("xml"), Some(ColumnKind::Text));
        assert_eq!(ColumnKind::from_mssql("sysname"), Some(ColumnKind::Text));
    }

    #[test]
    fn test_exotic_types_are_unsupported() {
        assert_eq!(ColumnKind::from_mssql("geography"), None);
        assert_eq!(ColumnKind::from_mssql("geometry"), None);
        assert_eq!(ColumnKind::from_mssql("hierarchyid"), None);
        assert_eq!(ColumnKind::from_mssql("sql_variant"), None);
    }

    #[test]
    fn test_table_full_name() {
        let table = Table {
            schema: "dbo".to_string(),
            name: "Users".to_string(),
            columns: vec![],
            rows: vec![],
        };
        assert_eq!(table.full_name(), "dbo.Users");
        assert_eq!(table.row_count(), 0);
    }
}
