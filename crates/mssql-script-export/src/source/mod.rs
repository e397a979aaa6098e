//! MSSQL row source implementation.
//!
//! Implements the [`RowSource`] trait on top of Tiberius with bb8 connection
//! pooling. Column metadata comes from `INFORMATION_SCHEMA.COLUMNS`; rows are
//! fetched with a single SELECT and fully materialized, in source order.

use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use tiberius::{AuthMethod, Client, Config as TdsConfig, EncryptionLevel, Query, Row};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::SourceConfig;
use crate::core::identifier::{qualify_mssql, quote_mssql};
use crate::core::schema::{Column, ColumnKind, Table};
use crate::core::traits::RowSource;
use crate::core::value::ScriptValue;
use crate::error::{ExportError, Result};

/// Connection acquisition timeout from pool (30 seconds).
const POOL_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Idle connection timeout (5 minutes).
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// Connection manager for bb8 pool with Tiberius.
#[derive(Clone)]
struct TiberiusConnectionManager {
    config: SourceConfig,
}

impl TiberiusConnectionManager {
    fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    fn build_config(&self) -> TdsConfig {
        let mut config = TdsConfig::new();
        config.host(&self.config.host);
        config.port(self.config.port);
        config.database(&self.config.database);
        config.authentication(AuthMethod::sql_server(
            &self.config.user,
            &self.config.password,
        ));

        if self.config.encrypt {
            if self.config.trust_server_cert {
                config.trust_cert();
            }
            config.encryption(EncryptionLevel::Required);
        } else {
            config.encryption(EncryptionLevel::NotSupported);
        }

        config
    }
}

#[async_trait]
impl bb8::ManageConnection for TiberiusConnectionManager {
    type Connection = Client<Compat<TcpStream>>;
    type Error = tiberius::error::Error;

    async fn connect(&self) -> std::result::Result<Self::Connection, Self::Error> {
        let config = self.build_config();
        let tcp = TcpStream::connect(config.get_addr()).await.map_err(|e| {
            tiberius::error::Error::Io {
                kind: e.kind(),
                message: e.to_string(),
            }
        })?;

        tcp.set_nodelay(true).ok();

        Client::connect(config, tcp.compat_write()).await
    }

    async fn is_valid(&self, conn: &mut Self::Connection) -> std::result::Result<(), Self::Error> {
        conn.simple_query("SELECT 1").await?.into_row().await?;
        Ok(())
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}

/// MSSQL row source backed by a bb8 connection pool.
///
/// The export loop is sequential, so the pool stays small; pooling still
/// buys reconnect handling and checkout-time validation.
pub struct MssqlRowSource {
    pool: Pool<TiberiusConnectionManager>,
}

impl MssqlRowSource {
    /// Create a new row source from configuration.
    pub async fn new(config: SourceConfig) -> Result<Self> {
        Self::with_pool_size(config, 2).await
    }

    /// Create a new row source with specified pool size.
    pub async fn with_pool_size(config: SourceConfig, max_size: u32) -> Result<Self> {
        let manager = TiberiusConnectionManager::new(config.clone());
        let pool = Pool::builder()
            .max_size(max_size)
            .min_idle(Some(1))
            .connection_timeout(POOL_CONNECTION_TIMEOUT)
            .idle_timeout(Some(POOL_IDLE_TIMEOUT))
            .test_on_check_out(true)
            .build(manager)
            .await
            .map_err(|e| ExportError::pool(e.to_string(), "creating MSSQL connection pool"))?;

        // Test connection
        {
            let mut conn = pool
                .get()
                .await
                .map_err(|e| ExportError::pool(e.to_string(), "testing MSSQL connection"))?;
            conn.simple_query("SELECT 1").await?.into_row().await?;
        }

        info!(
            "Connected to MSSQL: {}:{}/{}",
            config.host, config.port, config.database
        );

        Ok(Self { pool })
    }

    /// Get a pooled connection.
    async fn get_client(&self) -> Result<PooledConnection<'_, TiberiusConnectionManager>> {
        self.pool
            .get()
            .await
            .map_err(|e| ExportError::pool(e.to_string(), "getting MSSQL connection from pool"))
    }

    /// Load column metadata for a table, in ordinal order.
    async fn load_columns(
        &self,
        client: &mut Client<Compat<TcpStream>>,
        schema: &str,
        name: &str,
    ) -> Result<Vec<Column>> {
        let query = r#"
            SELECT
                COLUMN_NAME,
                DATA_TYPE,
                CAST(ISNULL(CHARACTER_MAXIMUM_LENGTH, 0) AS INT),
                CASE WHEN IS_NULLABLE = 'YES' THEN 1 ELSE 0 END,
                ORDINAL_POSITION
            FROM INFORMATION_SCHEMA.COLUMNS
            WHERE TABLE_SCHEMA = @P1 AND TABLE_NAME = @P2
            ORDER BY ORDINAL_POSITION
        "#;

        let mut query = Query::new(query);
        query.bind(schema);
        query.bind(name);

        let stream = query.query(client).await?;
        let rows = stream.into_first_result().await?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let col_name = row.get::<&str, _>(0).unwrap_or_default().to_string();
            let data_type = row.get::<&str, _>(1).unwrap_or_default().to_string();

            let kind = ColumnKind::from_mssql(&data_type).ok_or_else(|| {
                ExportError::UnsupportedType {
                    table: name.to_string(),
                    column: col_name.clone(),
                    data_type: data_type.clone(),
                }
            })?;

            columns.push(Column {
                name: col_name,
                data_type,
                kind,
                max_length: row.get::<i32, _>(2).unwrap_or(0),
                is_nullable: row.get::<i32, _>(3).unwrap_or(0) == 1,
                ordinal_pos: row.get::<i32, _>(4).unwrap_or(0),
            });
        }

        if columns.is_empty() {
            return Err(ExportError::SchemaExtraction(format!(
                "table {}.{} not found or has no columns",
                schema, name
            )));
        }

        debug!("Loaded {} columns for {}.{}", columns.len(), schema, name);
        Ok(columns)
    }
}

#[async_trait]
impl RowSource for MssqlRowSource {
    async fn fetch_table(&self, schema: &str, name: &str) -> Result<Table> {
        let mut client = self.get_client().await?;
        let columns = self.load_columns(&mut client, schema, name).await?;

        // Explicit column list in ordinal order keeps cells positionally
        // aligned with the metadata even if the table is later altered.
        let col_list = columns
            .iter()
            .map(|c| quote_mssql(&c.name))
            .collect::<Result<Vec<_>>>()?
            .join(", ");

        // No ORDER BY: rows are scripted in source order.
        let sql = format!("SELECT {} FROM {}", col_list, qualify_mssql(schema, name)?);

        let stream = client.simple_query(&sql).await?;
        let raw_rows = stream.into_first_result().await?;

        let mut rows = Vec::with_capacity(raw_rows.len());
        for raw in &raw_rows {
            let mut cells = Vec::with_capacity(columns.len());
            for (idx, col) in columns.iter().enumerate() {
                cells.push(convert_row_value(raw, idx, col));
            }
            rows.push(cells);
        }

        let table = Table {
            schema: schema.to_string(),
            name: name.to_string(),
            columns,
            rows,
        };
        debug!("Fetched {} rows from {}", table.row_count(), table.full_name());

        Ok(table)
    }

    async fn test_connection(&self) -> Result<()> {
        let mut client = self.get_client().await?;
        client.simple_query("SELECT 1").await?.into_row().await?;
        Ok(())
    }

    fn db_type(&self) -> &str {
        "mssql"
    }
}

/// Convert a fetched cell to a [`ScriptValue`] based on the column's MSSQL
/// type. Absent values become the NULL marker.
fn convert_row_value(row: &Row, idx: usize, col: &Column) -> ScriptValue<'static> {
    let dt = col.data_type.to_ascii_lowercase();

    match dt.as_str() {
        "bit" => row
            .get::<bool, _>(idx)
            .map(ScriptValue::Bool)
            .unwrap_or(ScriptValue::Null),
        "tinyint" => row
            .get::<u8, _>(idx)
            .map(|v| ScriptValue::I16(v as i16))
            .unwrap_or(ScriptValue::Null),
        "smallint" => row
            .get::<i16, _>(idx)
            .map(ScriptValue::I16)
            .unwrap_or(ScriptValue::Null),
        "int" => row
            .get::<i32, _>(idx)
            .map(ScriptValue::I32)
            .unwrap_or(ScriptValue::Null),
        "bigint" => row
            .get::<i64, _>(idx)
            .map(ScriptValue::I64)
            .unwrap_or(ScriptValue::Null),
        "real" => row
            .get::<f32, _>(idx)
            .map(ScriptValue::F32)
            .unwrap_or(ScriptValue::Null),
        "float" => row
            .get::<f64, _>(idx)
            .map(ScriptValue::F64)
            .unwrap_or(ScriptValue::Null),
        "uniqueidentifier" => row
            .get::<Uuid, _>(idx)
            .map(ScriptValue::Uuid)
            .unwrap_or(ScriptValue::Null),
        "datetime" | "datetime2" | "smalldatetime" => row
            .get::<NaiveDateTime, _>(idx)
            .map(ScriptValue::DateTime)
            .unwrap_or(ScriptValue::Null),
        "date" => row
            .get::<NaiveDate, _>(idx)
            .map(|d| ScriptValue::DateTime(d.and_time(NaiveTime::MIN)))
            .unwrap_or(ScriptValue::Null),
        // Not in the closed kind set: carried as text in a literal spelling
        // SQL Server accepts back into the same column type.
        "time" => row
            .get::<NaiveTime, _>(idx)
            .map(|t| ScriptValue::text_owned(t.format("%H:%M:%S%.3f").to_string()))
            .unwrap_or(ScriptValue::Null),
        "datetimeoffset" => row
            .get::<DateTime<FixedOffset>, _>(idx)
            .map(|dto| {
                ScriptValue::text_owned(dto.format("%Y-%m-%d %H:%M:%S%.3f %:z").to_string())
            })
            .unwrap_or(ScriptValue::Null),
        "binary" | "varbinary" | "image" | "timestamp" | "rowversion" => row
            .get::<&[u8], _>(idx)
            .map(|v| ScriptValue::Bytes(Cow::Owned(v.to_vec())))
            .unwrap_or(ScriptValue::Null),
        "decimal" | "numeric" | "money" | "smallmoney" => row
            .get::<rust_decimal::Decimal, _>(idx)
            .map(ScriptValue::Decimal)
            .or_else(|| {
                row.get::<f64, _>(idx).map(|f| {
                    rust_decimal::Decimal::try_from(f)
                        .map(ScriptValue::Decimal)
                        .unwrap_or(ScriptValue::F64(f))
                })
            })
            .unwrap_or(ScriptValue::Null),
        _ => {
            // Default: treat as string (see ColumnKind::from_mssql fallback)
            row.get::<&str, _>(idx)
                .map(|s| ScriptValue::Text(Cow::Owned(s.to_string())))
                .unwrap_or(ScriptValue::Null)
        }
    }
}
