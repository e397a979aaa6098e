//! Export orchestration - the sequential per-table run loop.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::core::traits::{RowSource, ScriptSink};
use crate::error::{ExportError, Result};
use crate::script::assemble;
use crate::sink::DirectorySink;
use crate::source::MssqlRowSource;

/// Export orchestrator.
///
/// Processes the configured tables one at a time: fetch, assemble, persist.
/// A failure aborts only that table's export; the run summary lists it.
pub struct Exporter {
    config: Config,
    source: Arc<dyn RowSource>,
    sink: Box<dyn ScriptSink>,
}

/// Result of an export run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResult {
    /// Unique run identifier.
    pub run_id: String,

    /// Final status: "success" or "partial".
    pub status: String,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// When the export started.
    pub started_at: DateTime<Utc>,

    /// When the export completed.
    pub completed_at: DateTime<Utc>,

    /// Total tables processed.
    pub tables_total: usize,

    /// Tables successfully exported (including empty ones).
    pub tables_success: usize,

    /// Tables that failed.
    pub tables_failed: usize,

    /// Tables with zero rows (no script written).
    pub tables_empty: usize,

    /// Total rows turned into INSERT statements.
    pub rows_scripted: u64,

    /// List of failed table names.
    pub failed_tables: Vec<String>,
}

impl ExportResult {
    /// Serialize the result as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

enum TableOutcome {
    Written { rows: u64 },
    Empty,
}

impl Exporter {
    /// Create an exporter wired to a live MSSQL source and a directory sink.
    pub async fn new(config: Config) -> Result<Self> {
        let source = MssqlRowSource::new(config.source.clone()).await?;
        let sink = DirectorySink::new(&config.export.output_dir)?;
        Ok(Self {
            config,
            source: Arc::new(source),
            sink: Box::new(sink),
        })
    }

    /// Create an exporter from explicit collaborators.
    pub fn with_parts(config: Config, source: Arc<dyn RowSource>, sink: Box<dyn ScriptSink>) -> Self {
        Self {
            config,
            source,
            sink,
        }
    }

    /// Run the export over every configured table, in order.
    ///
    /// `cancel` is checked between tables only; the pure formatting core is
    /// never interrupted mid-script. With `dry_run`, tables are fetched and
    /// assembled but nothing is written.
    pub async fn run(&self, cancel: CancellationToken, dry_run: bool) -> Result<ExportResult> {
        let started_at = Utc::now();
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let truncate_first = self.config.export.truncate_before_insert;
        let tables = &self.config.export.tables;

        info!(
            "Starting export run {} ({} tables, truncate={}, dry_run={})",
            run_id,
            tables.len(),
            truncate_first,
            dry_run
        );

        let mut tables_success = 0usize;
        let mut tables_empty = 0usize;
        let mut rows_scripted = 0u64;
        let mut failed_tables = Vec::new();

        for (i, table_name) in tables.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!("Export cancelled after {} tables", i);
                return Err(ExportError::Cancelled);
            }

            // Sequence numbers follow the configured order, so a failed or
            // empty table leaves a visible gap rather than shifting the rest.
            let seq = i + 1;

            match self
                .export_table(seq, table_name, truncate_first, dry_run)
                .await
            {
                Ok(TableOutcome::Written { rows }) => {
                    tables_success += 1;
                    rows_scripted += rows;
                }
                Ok(TableOutcome::Empty) => {
                    tables_success += 1;
                    tables_empty += 1;
                }
                Err(e) => {
                    error!("Export failed for table {}: {}", table_name, e);
                    failed_tables.push(table_name.clone());
                }
            }
        }

        let completed_at = Utc::now();
        let status = if failed_tables.is_empty() {
            "success"
        } else {
            "partial"
        };

        let result = ExportResult {
            run_id,
            status: status.to_string(),
            duration_seconds: start.elapsed().as_secs_f64(),
            started_at,
            completed_at,
            tables_total: tables.len(),
            tables_success,
            tables_failed: failed_tables.len(),
            tables_empty,
            rows_scripted,
            failed_tables,
        };

        info!(
            "Export {}: {}/{} tables, {} rows scripted in {:.2}s",
            result.status,
            result.tables_success,
            result.tables_total,
            result.rows_scripted,
            result.duration_seconds
        );

        Ok(result)
    }

    async fn export_table(
        &self,
        seq: usize,
        name: &str,
        truncate_first: bool,
        dry_run: bool,
    ) -> Result<TableOutcome> {
        info!("Loading table: {}", name);
        let table = self
            .source
            .fetch_table(&self.config.source.schema, name)
            .await?;
        let rows = table.row_count() as u64;

        let script = assemble(&table, truncate_first)?;
        if script.is_empty() {
            info!("Table {} has no rows, no script written", name);
            return Ok(TableOutcome::Empty);
        }

        if dry_run {
            info!("[dry-run] assembled script for {} ({} rows)", name, rows);
            return Ok(TableOutcome::Written { rows });
        }

        let path = self.sink.write_script(seq, name, &script)?;
        info!("Exported {} rows from {} to {}", rows, name, path.display());
        Ok(TableOutcome::Written { rows })
    }

    /// Probe the source connection.
    pub async fn health_check(&self) -> Result<()> {
        self.source.test_connection().await
    }
}
