//! Collaborator seams for the export pipeline.
//!
//! - [`RowSource`]: supplies schema and row data for a named table
//! - [`ScriptSink`]: persists one generated script per table
//!
//! The pure core (formatter, assembler) sits between these two seams and
//! performs no I/O of its own.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;

use super::schema::Table;

/// Supplies schema and fully materialized row data for a named table.
///
/// Implementations must return a [`Table`] whose column order matches the
/// row cell order, map every source-side NULL to `ScriptValue::Null`, and
/// map every source-side native type into exactly one [`super::ColumnKind`].
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetch a table's column schema and all of its rows, in source order.
    async fn fetch_table(&self, schema: &str, name: &str) -> Result<Table>;

    /// Round-trip a trivial query to prove the connection works.
    async fn test_connection(&self) -> Result<()>;

    /// Get the database type identifier (e.g., "mssql").
    fn db_type(&self) -> &str;
}

/// Persists one generated script per table.
pub trait ScriptSink: Send + Sync {
    /// Write `script` as the artifact for `table_name`.
    ///
    /// `seq` is the run's monotonically increasing output sequence number;
    /// implementations derive a unique-per-table artifact name from it.
    /// Returns the written path.
    fn write_script(&self, seq: usize, table_name: &str, script: &str) -> Result<PathBuf>;
}
