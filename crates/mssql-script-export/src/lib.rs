//! # mssql-script-export
//!
//! Exports the full contents of a set of SQL Server tables into standalone,
//! replayable `.sql` scripts, one script per table: a point-in-time
//! data-to-script dumper for seeding, migration, or backup.
//!
//! - **Typed literal formatting**: every cell is rendered by a per-kind
//!   quoting/escaping rule (quote doubling for text, invariant zero-padded
//!   timestamps, `0x` hex for binary, `1`/`0` bits)
//! - **TRUNCATE preambles**: optionally reset each table before its INSERTs
//! - **GO batch separators**: scripts replay statement-by-statement under
//!   sqlcmd/SSMS
//! - **Sequential export** with per-table failure isolation and a
//!   serializable run summary
//!
//! ## Example
//!
//! ```rust,no_run
//! use mssql_script_export::{Config, Exporter};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> mssql_script_export::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let exporter = Exporter::new(config).await?;
//!     let result = exporter.run(CancellationToken::new(), false).await?;
//!     println!("Scripted {} rows", result.rows_scripted);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod exporter;
pub mod format;
pub mod script;
pub mod sink;
pub mod source;

// Re-exports for convenient access
pub use config::{Config, ExportConfig, SourceConfig};
pub use self::core::schema::{Column, ColumnKind, Table};
pub use self::core::traits::{RowSource, ScriptSink};
pub use self::core::value::ScriptValue;
pub use error::{ExportError, Result};
pub use exporter::{ExportResult, Exporter};
pub use format::sql_literal;
pub use script::{assemble, BATCH_SEPARATOR};
pub use sink::DirectorySink;
pub use source::MssqlRowSource;
