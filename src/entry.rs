//! File metadata snapshot used by the rule engine

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use chrono::{DateTime, Utc};

/// Read-only view of one directory entry, captured at scan time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Birth time when the filesystem reports one, otherwise last modification time
    pub created_at: DateTime<Utc>,
    pub is_dir: bool,
}

impl FileEntry {
    pub fn from_metadata(path: &Path, metadata: &Metadata) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let created_at = metadata
            .created()
            .or_else(|_| metadata.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| DateTime::<Utc>::from(UNIX_EPOCH));

        Self {
            name,
            path: path.to_path_buf(),
            size_bytes: metadata.len(),
            created_at,
            is_dir: metadata.is_dir(),
        }
    }

    /// Lowercased extension including the leading dot.
    ///
    /// `report.PDF` gives `.pdf`, `name.` gives `.`, and dotfiles such as
    /// `.bashrc` have no extension.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
    }

    pub fn size_megabytes(&self) -> f64 {
        self.size_bytes as f64 / 1024.0 / 1024.0
    }
}
