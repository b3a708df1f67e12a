//! Table Cache Module
//! Keeps loaded tables keyed by source identity so a filter change never
//! re-parses an unchanged file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::loader::{LoadSummary, LoaderError, SalesLoader};

/// Identity of a source file at load time. A different signature means the
/// cached table no longer reflects the file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SourceSignature {
    len: u64,
    modified: Option<SystemTime>,
}

impl SourceSignature {
    fn probe(path: &Path) -> Result<Self, LoaderError> {
        let meta =
            fs::metadata(path).map_err(|_| LoaderError::SourceNotFound(path.to_path_buf()))?;
        Ok(Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

/// Map from source path to its signature and loaded table.
///
/// Tables are shared read-only behind an `Arc`. There is no TTL: entries live
/// until the file's signature changes or the caller invalidates them.
#[derive(Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, (SourceSignature, Arc<LoadSummary>)>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table if the file on disk still matches it.
    pub fn peek(&self, path: &Path) -> Option<Arc<LoadSummary>> {
        let signature = SourceSignature::probe(path).ok()?;
        let (cached, summary) = self.entries.get(path)?;
        if *cached == signature {
            log::debug!("table cache hit for {}", path.display());
            Some(Arc::clone(summary))
        } else {
            None
        }
    }

    /// Record a freshly loaded table under the file's current signature.
    pub fn store(&mut self, path: &Path, summary: Arc<LoadSummary>) {
        if let Ok(signature) = SourceSignature::probe(path) {
            self.entries.insert(path.to_path_buf(), (signature, summary));
        }
    }

    /// Load through the cache: hits return the shared table, misses parse the
    /// file and remember the result. The GUI splits this into peek/store so
    /// the parse can run off the UI thread.
    #[allow(dead_code)]
    pub fn load(&mut self, path: &Path) -> Result<Arc<LoadSummary>, LoaderError> {
        if let Some(summary) = self.peek(path) {
            return Ok(summary);
        }
        log::debug!("table cache miss for {}", path.display());
        let summary = Arc::new(SalesLoader::load_csv(path)?);
        self.store(path, Arc::clone(&summary));
        Ok(summary)
    }

    /// Drop the entry for one source, forcing the next load to re-parse.
    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }

    #[allow(dead_code)]
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
