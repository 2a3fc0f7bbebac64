//! Serialization and atomic writing of bmson documents.

use std::{io::Write as _, path::Path};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::bmson::Bmson;

/// An error occurred when writing a bmson document to disk.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum WriteError {
    /// The document failed to serialize.
    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The file system refused the write.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Serializes the document as pretty-printed JSON.
///
/// Equal documents serialize into byte-identical text, so re-emitting an unchanged chart is
/// idempotent.
///
/// # Errors
///
/// Returns an error when `serde_json` fails to serialize the document.
pub fn to_json(bmson: &Bmson) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(bmson)
}

/// Writes the document to `path` atomically.
///
/// The whole document is serialized in memory first, written into a temporary file in the
/// destination directory and renamed over `path`, so a crash mid-write can never leave a partial
/// document visible to a client.
///
/// # Errors
///
/// Returns an error when serialization or any file system operation fails.
pub fn write_bmson(path: &Path, bmson: &Bmson) -> Result<(), WriteError> {
    let json = to_json(bmson)?;
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut file = NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))?;
    file.write_all(json.as_bytes())?;
    file.persist(path).map_err(|error| WriteError::Io(error.error))?;
    Ok(())
}
