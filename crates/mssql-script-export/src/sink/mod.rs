//! Script persistence.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::traits::ScriptSink;
use crate::error::Result;

/// Writes generated scripts into a directory, one file per table.
///
/// Artifacts are named `NN_<table>_INSERT.sql`, where `NN` is the run's
/// output sequence number, so a directory listing replays in export order.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create the sink, creating the directory tree on demand.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    /// Directory receiving the scripts.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(seq: usize, table_name: &str) -> String {
        // Identifiers are validated upstream; path separators are still
        // replaced so an odd table name cannot escape the directory.
        let safe: String = table_name
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' => '_',
                c => c,
            })
            .collect();
        format!("{:02}_{}_INSERT.sql", seq, safe)
    }
}

impl ScriptSink for DirectorySink {
    fn write_script(&self, seq: usize, table_name: &str, script: &str) -> Result<PathBuf> {
        let path = self.dir.join(Self::file_name(seq, table_name));
        fs::write(&path, script)?;
        info!("Wrote {} ({} bytes)", path.display(), script.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_format() {
        assert_eq!(DirectorySink::file_name(1, "Users"), "01_Users_INSERT.sql");
        assert_eq!(
            DirectorySink::file_name(12, "AuditLog"),
            "12_AuditLog_INSERT.sql"
        );
    }

    #[test]
    fn test_file_name_replaces_path_separators() {
        assert_eq!(
            DirectorySink::file_name(3, "odd/na\\me"),
            "03_odd_na_me_INSERT.sql"
        );
    }

    #[test]
    fn test_write_script_creates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path().join("scripts")).unwrap();

        let path = sink
            .write_script(1, "Users", "INSERT INTO [Users] ([Id]) VALUES (1);\nGO\n")
            .unwrap();

        assert!(path.ends_with("01_Users_INSERT.sql"));
        let content = fs::read_to_string(path).unwrap();
        assert!(content.starts_with("INSERT INTO [Users]"));
    }

    #[test]
    fn test_write_script_overwrites_previous_run() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path()).unwrap();

        sink.write_script(1, "Users", "old").unwrap();
        let path = sink.write_script(1, "Users", "new").unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "new");
    }
}
