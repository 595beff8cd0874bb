use std::io;
use std::path::{Path, PathBuf};

use folio_types::ProjectId;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::payload::decode_payload;

/// Default decoded-size limit for a single image (5 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Result of writing a blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredBlob {
    /// Location on disk.
    pub path: PathBuf,
    /// Reference stored in the project's `image` field.
    pub public_path: String,
    pub content_type: &'static str,
    pub size: u64,
}

/// Image blobs, one file per project under a single directory.
///
/// Files are named `<id>.<ext>` and published as `<public_prefix>/<id>.<ext>`.
/// Blobs for distinct ids never contend, so no locking is involved.
#[derive(Clone, Debug)]
pub struct BlobStore {
    dir: PathBuf,
    public_prefix: String,
    max_bytes: u64,
}

impl BlobStore {
    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        let public_prefix = public_prefix.into().trim_end_matches('/').to_string();
        Self {
            dir: dir.into(),
            public_prefix,
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    /// Override the decoded-size limit.
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Decode `payload` and write it as the blob for `id`.
    ///
    /// Size is validated here regardless of what the caller checked. Nothing
    /// is written when the payload is rejected. Blobs are never replaced: if
    /// `<id>.<ext>` already exists the write fails with `DuplicateId` and the
    /// existing file is left as it was.
    pub async fn write(&self, payload: &str, id: &ProjectId) -> StoreResult<StoredBlob> {
        let image = decode_payload(payload, self.max_bytes)?;
        let file_name = format!("{id}.{}", image.extension);
        let path = self.dir.join(&file_name);

        let opened = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await;
        let mut file = match opened {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(StoreError::DuplicateId(id.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        if let Err(e) = write_blob(&mut file, &image.bytes).await {
            drop(file);
            let _ = tokio::fs::remove_file(&path).await;
            return Err(e.into());
        }

        let size = image.bytes.len() as u64;
        debug!(%id, path = %path.display(), size, "wrote image blob");
        Ok(StoredBlob {
            public_path: format!("{}/{file_name}", self.public_prefix),
            content_type: content_type_for(&file_name),
            path,
            size,
        })
    }

    /// Map a project's `image` reference back to its file.
    ///
    /// Returns `None` for references outside this store's prefix or that
    /// would escape the blob directory.
    pub fn resolve(&self, image_ref: &str) -> Option<PathBuf> {
        let file_name = image_ref
            .strip_prefix(self.public_prefix.as_str())?
            .strip_prefix('/')?;
        is_safe_file_name(file_name).then(|| self.dir.join(file_name))
    }

    /// Read a blob by file name, with its content type.
    pub async fn read(&self, file_name: &str) -> StoreResult<(Vec<u8>, &'static str)> {
        if !is_safe_file_name(file_name) {
            return Err(StoreError::BlobNotFound(file_name.to_string()));
        }
        match tokio::fs::read(self.dir.join(file_name)).await {
            Ok(bytes) => Ok((bytes, content_type_for(file_name))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::BlobNotFound(file_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

async fn write_blob(file: &mut tokio::fs::File, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes).await?;
    file.sync_all().await
}

/// MIME type implied by a blob's extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// A single path component made of id characters and dots, not hidden.
fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
