//! Filesystem side of an execute pass

use std::io;
use std::path::Path;

use tokio::fs;
use tracing::{debug, warn};

/// Failed filesystem step, tagged with the operation that failed
#[derive(Debug)]
pub(crate) struct MoveStepError {
    pub operation: &'static str,
    pub source: io::Error,
}

impl MoveStepError {
    fn new(operation: &'static str, source: io::Error) -> Self {
        Self { operation, source }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MoveMethod {
    Rename,
    CopyAndDelete,
}

/// Create `path` and any missing parents. An existing folder is fine.
pub(crate) async fn ensure_directory(path: &Path) -> Result<(), MoveStepError> {
    match fs::create_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && is_directory(path).await => Ok(()),
        Err(e) => Err(MoveStepError::new("create directory", e)),
    }
}

async fn is_directory(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
}

/// Move `source` to `target`.
///
/// Renames first. Regular files that live on another filesystem are copied
/// and the original removed; folders are never copied.
pub(crate) async fn move_path(source: &Path, target: &Path, is_dir: bool) -> Result<MoveMethod, MoveStepError> {
    match fs::rename(source, target).await {
        Ok(()) => return Ok(MoveMethod::Rename),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices && !is_dir => {
            debug!(source = %source.display(), "Rename crosses filesystems, copying instead");
        }
        Err(e) => return Err(MoveStepError::new("rename", e)),
    }

    if let Err(e) = fs::copy(source, target).await {
        match fs::remove_file(target).await {
            Err(cleanup) if cleanup.kind() != io::ErrorKind::NotFound => {
                warn!(target = %target.display(), error = %cleanup, "Could not remove partial copy");
            }
            _ => {}
        }
        return Err(MoveStepError::new("copy", e));
    }

    fs::remove_file(source)
        .await
        .map_err(|e| MoveStepError::new("remove source", e))?;

    Ok(MoveMethod::CopyAndDelete)
}
