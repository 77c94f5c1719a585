// JSON document persistence shared by the account and client stores

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Corrupt {document} document: {source}")]
    Corrupt {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize {document} document: {source}")]
    Serialize {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw access to the bytes of one persisted document.
///
/// Stores never touch the filesystem directly; they go through a snapshot so
/// the write path can be swapped out in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Snapshot: Send + Sync {
    /// Returns `None` when the document has never been written.
    fn read(&self) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replaces the whole document.
    fn write(&self, contents: &[u8]) -> Result<(), StorageError>;
}

/// A document on disk, replaced atomically on every write.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl Snapshot for JsonFile {
    fn read(&self) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn write(&self, contents: &[u8]) -> Result<(), StorageError> {
        let directory = self.directory();
        fs::create_dir_all(directory).map_err(|e| self.io_error(e))?;

        // The temp file lives next to the target so the rename stays on one filesystem.
        let mut staged = NamedTempFile::new_in(directory).map_err(|e| self.io_error(e))?;
        staged.write_all(contents).map_err(|e| self.io_error(e))?;
        staged.as_file().sync_all().map_err(|e| self.io_error(e))?;
        staged
            .persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;

        tracing::debug!("Wrote {} bytes to {:?}", contents.len(), self.path);
        Ok(())
    }
}

/// Decode a document, treating a missing one as `None`.
pub fn load_document<T: DeserializeOwned>(
    snapshot: &dyn Snapshot,
    document: &'static str,
) -> Result<Option<T>, StorageError> {
    let Some(bytes) = snapshot.read()? else {
        return Ok(None);
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StorageError::Corrupt { document, source })
}

/// Encode and write a whole document.
pub fn save_document<T: Serialize>(
    snapshot: &dyn Snapshot,
    document: &'static str,
    value: &T,
) -> Result<(), StorageError> {
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|source| StorageError::Serialize { document, source })?;
    snapshot.write(&bytes)
}
