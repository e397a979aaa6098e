//! Configuration validation.

use super::Config;
use crate::core::identifier::validate_identifier;
use crate::error::{ExportError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    // Source validation
    if config.source.host.is_empty() {
        return Err(ExportError::Config("source.host is required".into()));
    }
    if config.source.database.is_empty() {
        return Err(ExportError::Config("source.database is required".into()));
    }
    if config.source.user.is_empty() {
        return Err(ExportError::Config("source.user is required".into()));
    }
    if config.source.r#type != "mssql" {
        return Err(ExportError::Config(format!(
            "source.type must be 'mssql', got '{}'",
            config.source.r#type
        )));
    }
    validate_identifier(&config.source.schema)
        .map_err(|e| ExportError::Config(format!("source.schema: {}", e)))?;

    // Export validation
    if config.export.tables.is_empty() {
        return Err(ExportError::Config(
            "export.tables must list at least one table".into(),
        ));
    }
    for table in &config.export.tables {
        validate_identifier(table)
            .map_err(|e| ExportError::Config(format!("export.tables entry {:?}: {}", table, e)))?;
    }

    Ok(())
}
