/// Per-folder locks for filename collision resolution
///
/// Picking a free `name_N.ext` is a check-then-create sequence. Holding the
/// lock for the destination folder across that sequence keeps two downloads
/// from computing the same suffix.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Lazily created async mutexes keyed by folder path
#[derive(Debug, Default)]
pub struct FolderLocks {
    locks: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

impl FolderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock guarding `folder`, creating it on first use
    ///
    /// The same `Arc` is handed out for the same path for the lifetime of the
    /// table.
    pub fn lock_for(&self, folder: &Path) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(locks.entry(folder.to_path_buf()).or_default())
    }

    /// Returns the number of folders that have been locked so far
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
