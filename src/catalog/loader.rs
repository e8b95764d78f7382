//! On-demand loading of a catalog document from disk.
//!
//! The location is checked once at construction; every `load` re-reads the
//! file so edits show up in the next catalog. Nothing is cached between loads.

use crate::catalog::lookup::Catalog;
use crate::error::{CatalogError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Handle on a catalog file that can be re-read at any time.
pub struct CatalogWatch {
    path: PathBuf,
}

impl CatalogWatch {
    /// Fails fast when `path` does not exist or cannot be inspected.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        fs::metadata(&path).map_err(|source| CatalogError::Location {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file fresh and parse it into a new catalog.
    pub fn load(&self) -> Result<Catalog> {
        let bytes = fs::read(&self.path).map_err(|source| CatalogError::Location {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "read installation catalog");
        Catalog::from_yaml_slice(&bytes)
    }

    /// Like `load`, but hands back a shareable handle for many readers.
    pub fn load_shared(&self) -> Result<Arc<Catalog>> {
        self.load().map(Arc::new)
    }
}
