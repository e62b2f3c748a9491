//! Storage module for the mirrored site on disk
//!
//! This module handles:
//! - Classifying resources into typed subfolders
//! - Naming pages and resources
//! - Writing files without overwriting an earlier download of the same name

mod classify;
mod layout;

pub use classify::{
    classify, extension_for_mime, url_extension, Classification, KNOWN_SUBFOLDERS,
    OTHER_SUBFOLDER,
};
pub use layout::{
    collision_candidate, page_filename, reserve_unique_path, resource_filename, split_extension,
    INDEX_FILENAME,
};

use crate::state::FolderLocks;
use crate::MirrorError;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Writes pages and resources below one base folder
#[derive(Debug)]
pub struct ResourceStore {
    base_folder: PathBuf,
    locks: FolderLocks,
}

impl ResourceStore {
    /// Creates a store rooted at `base_folder`
    ///
    /// The folder itself is created by [`ResourceStore::prepare`].
    pub fn new(base_folder: impl Into<PathBuf>) -> Self {
        Self {
            base_folder: base_folder.into(),
            locks: FolderLocks::new(),
        }
    }

    /// Returns the base folder
    pub fn base_folder(&self) -> &Path {
        &self.base_folder
    }

    /// Creates the base folder if it does not exist
    pub async fn prepare(&self) -> Result<(), MirrorError> {
        create_dir(&self.base_folder).await
    }

    /// Stores a downloaded resource
    ///
    /// The resource goes to `<base>/<subfolder>/<filename>`, or the first free
    /// `_N` variant of it.
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - The path the body was written to
    /// * `Err(MirrorError)` - The folder could not be created or written
    pub async fn store_resource(
        &self,
        classification: &Classification,
        filename: &str,
        body: &[u8],
    ) -> Result<PathBuf, MirrorError> {
        let folder = self.base_folder.join(&classification.subfolder);
        create_dir(&folder).await?;

        let (path, mut file) = {
            let lock = self.locks.lock_for(&folder);
            let _guard = lock.lock().await;
            reserve_unique_path(&folder, filename)
                .await
                .map_err(|source| MirrorError::File {
                    path: folder.join(filename),
                    source,
                })?
        };

        write_body(&mut file, &path, body).await?;
        Ok(path)
    }

    /// Stores a page, replacing any earlier file of the same name
    pub async fn store_page(&self, filename: &str, html: &str) -> Result<PathBuf, MirrorError> {
        let path = self.base_folder.join(filename);
        tokio::fs::write(&path, html)
            .await
            .map_err(|source| MirrorError::File {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

async fn create_dir(path: &Path) -> Result<(), MirrorError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| MirrorError::File {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes `body` to a freshly reserved file, removing the file on failure
async fn write_body<W>(writer: &mut W, path: &Path, body: &[u8]) -> Result<(), MirrorError>
where
    W: AsyncWrite + Unpin,
{
    let written = match writer.write_all(body).await {
        Ok(()) => writer.flush().await,
        Err(e) => Err(e),
    };

    if let Err(source) = written {
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::debug!("Failed to remove partial file {}: {}", path.display(), e);
        }
        return Err(MirrorError::File {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
