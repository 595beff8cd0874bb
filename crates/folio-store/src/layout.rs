use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::StoreResult;
use crate::file::{create_atomic, encode_collection};

/// On-disk locations of the blob directory and the collection file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreLayout {
    blob_dir: PathBuf,
    collection_file: PathBuf,
}

impl StoreLayout {
    /// Blob directory relative to the site root.
    pub const DEFAULT_BLOB_DIR: &'static str = "public/projects";
    /// Collection file relative to the site root.
    pub const DEFAULT_COLLECTION_FILE: &'static str = "public/data/projects.json";

    pub fn new(blob_dir: impl Into<PathBuf>, collection_file: impl Into<PathBuf>) -> Self {
        Self {
            blob_dir: blob_dir.into(),
            collection_file: collection_file.into(),
        }
    }

    /// The default layout beneath `root`.
    pub fn under_root(root: &Path) -> Self {
        Self::new(
            root.join(Self::DEFAULT_BLOB_DIR),
            root.join(Self::DEFAULT_COLLECTION_FILE),
        )
    }

    pub fn blob_dir(&self) -> &Path {
        &self.blob_dir
    }

    pub fn collection_file(&self) -> &Path {
        &self.collection_file
    }

    /// Create the blob directory, the collection's directory, and an empty
    /// collection file if none exists.
    ///
    /// Idempotent. An existing collection file is never rewritten, even if
    /// it fails to parse. Fails only when a location cannot be created.
    pub async fn ensure(&self) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.blob_dir).await?;

        if let Some(parent) = self
            .collection_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let empty = encode_collection(&[])?;
        if create_atomic(&self.collection_file, empty).await? {
            info!(path = %self.collection_file.display(), "created empty project collection");
        }

        debug!(
            blob_dir = %self.blob_dir.display(),
            collection = %self.collection_file.display(),
            "store layout ready"
        );
        Ok(())
    }
}
