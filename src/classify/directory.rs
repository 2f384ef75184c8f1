use std::ffi::OsString;
use std::path::Path;

use tokio::fs;

use super::error::ClassifyError;

/// Names of the immediate entries of `path`, sorted.
///
/// Files and folders are both included; nothing is recursed into.
/// Names that are not valid UTF-8 are converted lossily.
pub async fn list_directory(path: impl AsRef<Path>) -> Result<Vec<String>, ClassifyError> {
    let names = read_sorted_names(path.as_ref()).await?;
    Ok(names
        .into_iter()
        .map(|name| name.to_string_lossy().into_owned())
        .collect())
}

/// Raw entry names of `path` in byte order
pub(crate) async fn read_sorted_names(path: &Path) -> Result<Vec<OsString>, ClassifyError> {
    let mut entries = fs::read_dir(path)
        .await
        .map_err(|e| ClassifyError::read_dir(path, e))?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ClassifyError::read_dir(path, e))?
    {
        names.push(entry.file_name());
    }

    names.sort();
    tracing::debug!(path = %path.display(), entries = names.len(), "Listed directory");
    Ok(names)
}
