//! Memory-mapped file provider
//!
//! Supplies the bytes of a file that may still be growing, e.g. a download
//! in progress. Each copy maps whatever length the file has at that moment.

use crate::domain::repositories::DataProvider;
use bytes::Bytes;
use memmap2::Mmap;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when opening a file provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// File-backed data provider
pub struct MappedFileProvider {
    path: PathBuf,
}

impl MappedFileProvider {
    /// Opens a provider over `path`
    ///
    /// The file must exist and be readable; it may be empty.
    pub fn open(path: &Path) -> Result<Self, ProviderError> {
        if !path.exists() {
            return Err(ProviderError::NotFound(path.display().to_string()));
        }

        Self::open_file(path).map_err(|e| {
            if e.kind() == io::ErrorKind::PermissionDenied {
                ProviderError::PermissionDenied(path.display().to_string())
            } else {
                ProviderError::IoError(e)
            }
        })?;

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current length of the file in bytes
    pub fn len(&self) -> io::Result<u64> {
        Ok(Self::open_file(&self.path)?.metadata()?.len())
    }

    pub fn is_empty(&self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }

    fn open_file(path: &Path) -> io::Result<File> {
        OpenOptions::new().read(true).open(path)
    }
}

impl DataProvider for MappedFileProvider {
    fn copy_bytes(&self) -> io::Result<Bytes> {
        let file = Self::open_file(&self.path)?;
        if file.metadata()?.len() == 0 {
            // Zero-length mappings are rejected on some platforms.
            return Ok(Bytes::new());
        }

        // The mapping lives only for the copy below.
        let mmap = unsafe { Mmap::map(&file) }?;
        Ok(Bytes::copy_from_slice(&mmap))
    }
}
