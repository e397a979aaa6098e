//! INSERT-script assembly.
//!
//! Turns one materialized [`Table`] into a complete, replayable script:
//! an optional `TRUNCATE TABLE` preamble followed by one `INSERT` statement
//! per row, each terminated by a batch-separator line so the script executes
//! as independent batches under sqlcmd/SSMS.

use crate::core::identifier::quote_mssql;
use crate::core::schema::Table;
use crate::error::{ExportError, Result};
use crate::format::sql_literal;

/// Batch separator line between executable units.
pub const BATCH_SEPARATOR: &str = "GO";

/// Assemble a complete script for one table.
///
/// A table with zero rows yields the empty string: no TRUNCATE, no INSERTs,
/// even when `truncate_first` is set. Rows are emitted in source order; the
/// assembler never deduplicates, sorts, or filters.
///
/// # Errors
///
/// Returns [`ExportError::SchemaMismatch`] if any row's cell count differs
/// from the column count, and `ExportError::Config` for invalid identifiers.
/// Validation runs before any text is produced, so an error never yields a
/// partial script.
pub fn assemble(table: &Table, truncate_first: bool) -> Result<String> {
    if table.rows.is_empty() {
        return Ok(String::new());
    }

    // Contract check up front: a malformed row is a row-source bug, and
    // aborting here guarantees no truncated script reaches the sink.
    for (row_index, row) in table.rows.iter().enumerate() {
        if row.len() != table.columns.len() {
            return Err(ExportError::SchemaMismatch {
                table: table.name.clone(),
                row_index,
                expected: table.columns.len(),
                actual: row.len(),
            });
        }
    }

    let table_ident = quote_mssql(&table.name)?;
    let column_list = table
        .columns
        .iter()
        .map(|c| quote_mssql(&c.name))
        .collect::<Result<Vec<_>>>()?
        .join(", ");

    // Rough guess: preamble plus ~64 bytes of fixed text per row.
    let mut script = String::with_capacity(64 * (table.rows.len() + 1));

    if truncate_first {
        script.push('\n');
        script.push_str("TRUNCATE TABLE ");
        script.push_str(&table_ident);
        script.push_str(";\n");
        script.push_str(BATCH_SEPARATOR);
        script.push_str("\n\n");
    }

    for row in &table.rows {
        let values = row.iter().map(sql_literal).collect::<Vec<_>>().join(", ");
        script.push_str(&format!(
            "INSERT INTO {} ({}) VALUES ({});\n",
            table_ident, column_list, values
        ));
        script.push_str(BATCH_SEPARATOR);
        script.push('\n');
    }

    Ok(script)
}
