use std::path::{Path, PathBuf};

use folio_store::{BlobStore, StoreLayout, DEFAULT_MAX_IMAGE_BYTES};
use serde::{Deserialize, Serialize};

use crate::error::{PortfolioError, PortfolioResult};

/// Path namespace of the HTTP API; blobs cannot be published under it.
pub const API_PREFIX: &str = "/v1";

/// Where a portfolio keeps its data, and how large images may be.
///
/// Relative `blob_dir` and `collection_file` paths resolve against `root`.
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// root = "/srv/portfolio"
/// max_image_bytes = 2_097_152
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortfolioConfig {
    pub root: PathBuf,
    pub blob_dir: PathBuf,
    pub collection_file: PathBuf,
    /// URL prefix under which blobs are published.
    pub public_prefix: String,
    /// Largest decoded image accepted, in bytes.
    pub max_image_bytes: u64,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            blob_dir: PathBuf::from(StoreLayout::DEFAULT_BLOB_DIR),
            collection_file: PathBuf::from(StoreLayout::DEFAULT_COLLECTION_FILE),
            public_prefix: "/projects".into(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl PortfolioConfig {
    /// Default configuration rooted at `root`.
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> PortfolioResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| PortfolioError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> PortfolioResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| PortfolioError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Check limits and the public prefix.
    ///
    /// The prefix must be an absolute literal path outside [`API_PREFIX`].
    pub fn validate(&self) -> PortfolioResult<()> {
        if self.max_image_bytes == 0 {
            return Err(PortfolioError::Config(
                "max_image_bytes must be greater than zero".into(),
            ));
        }
        if !self.public_prefix.starts_with('/') {
            return Err(PortfolioError::Config(format!(
                "public_prefix must start with '/': {:?}",
                self.public_prefix
            )));
        }
        let prefix = self.public_prefix.trim_end_matches('/');
        if prefix == API_PREFIX || prefix.starts_with(&format!("{API_PREFIX}/")) {
            return Err(PortfolioError::Config(format!(
                "public_prefix {:?} overlaps the {API_PREFIX} API routes",
                self.public_prefix
            )));
        }
        if prefix.contains([':', '*', '{', '}']) {
            return Err(PortfolioError::Config(format!(
                "public_prefix must be a literal path: {:?}",
                self.public_prefix
            )));
        }
        Ok(())
    }

    /// Resolved storage locations.
    pub fn layout(&self) -> StoreLayout {
        StoreLayout::new(
            self.root.join(&self.blob_dir),
            self.root.join(&self.collection_file),
        )
    }

    /// Blob store for the resolved blob directory.
    pub fn blob_store(&self) -> BlobStore {
        BlobStore::new(self.root.join(&self.blob_dir), self.public_prefix.clone())
            .with_max_bytes(self.max_image_bytes)
    }
}
