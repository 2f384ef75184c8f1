use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::Diagnostic;

/// Errors that stop a classification pass
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("directory not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("permission denied reading directory: {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("failed to read directory: {}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// First failing move of an execute pass; `moved` files were already moved
    #[error("failed to move {file} to {} ({operation} failed after {moved} file(s) moved)", target.display())]
    Move {
        file: String,
        target: PathBuf,
        operation: &'static str,
        moved: usize,
        /// Diagnostics collected before the pass stopped
        diagnostics: Vec<Diagnostic>,
        #[source]
        source: io::Error,
    },

    #[error("invalid exclude pattern '{pattern}'")]
    InvalidExclude {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

impl ClassifyError {
    pub(crate) fn read_dir(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::DirectoryRead { path, source },
        }
    }
}
