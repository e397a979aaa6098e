//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use std::path::Path;

use crate::error::Result;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_YAML: &str = r#"
source:
  host: localhost
  database: AppDb
  user: sa
  password: secret
export:
  tables: [Users]
"#;

    #[test]
    fn test_from_yaml_applies_defaults() {
        let config = Config::from_yaml(MINIMAL_YAML).unwrap();
        assert_eq!(config.source.r#type, "mssql");
        assert_eq!(config.source.port, 1433);
        assert_eq!(config.source.schema, "dbo");
        assert!(config.source.encrypt);
        assert!(!config.source.trust_server_cert);
        assert!(!config.export.truncate_before_insert);
        assert_eq!(
            config.export.output_dir,
            std::path::PathBuf::from("DataScripts")
        );
    }

    #[test]
    fn test_from_yaml_rejects_invalid() {
        assert!(Config::from_yaml("source: {}").is_err());
        assert!(Config::from_yaml("not: [valid").is_err());
    }

    #[test]
    fn test_table_order_is_preserved() {
        let yaml = r#"
source:
  host: localhost
  database: AppDb
  user: sa
  password: secret
export:
  tables: [Orders, Users, AuditLog]
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.export.tables, vec!["Orders", "Users", "AuditLog"]);
    }
}
