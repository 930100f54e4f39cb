//! Data provider trait
//!
//! An external source of image bytes, as an alternative to pushing
//! in-memory chunks into the session.

use bytes::Bytes;
use std::io;

/// Trait for external byte suppliers
///
/// A provider hands out everything it has received so far; backends
/// replace their buffer with the returned bytes rather than appending.
pub trait DataProvider {
    /// Copies the bytes currently available from the provider
    fn copy_bytes(&self) -> io::Result<Bytes>;
}

impl DataProvider for Bytes {
    fn copy_bytes(&self) -> io::Result<Bytes> {
        Ok(self.clone())
    }
}

impl DataProvider for Vec<u8> {
    fn copy_bytes(&self) -> io::Result<Bytes> {
        Ok(Bytes::copy_from_slice(self))
    }
}

impl DataProvider for [u8] {
    fn copy_bytes(&self) -> io::Result<Bytes> {
        Ok(Bytes::copy_from_slice(self))
    }
}
