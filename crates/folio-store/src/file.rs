use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use folio_types::Project;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::{CollectionRead, ProjectStore};

/// Project collection kept as a single JSON array on disk.
///
/// Every append reads the whole file, adds the record and writes the whole
/// file back. The read-modify-write runs under an async mutex, and the new
/// contents go to a temporary file in the same directory that is fsynced
/// and renamed over the old one. Readers take no lock: the rename means
/// they see either the old or the new file.
///
/// The mutex only serializes appends made through this instance. Keep one
/// `FileProjectStore` per collection file per process and share it behind
/// an `Arc`.
#[derive(Debug)]
pub struct FileProjectStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileProjectStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the collection file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_raw(&self) -> StoreResult<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ProjectStore for FileProjectStore {
    async fn load(&self) -> StoreResult<CollectionRead> {
        let Some(bytes) = self.read_raw().await? else {
            return Ok(CollectionRead::Absent);
        };
        Ok(match parse_collection(&bytes) {
            Ok(projects) => CollectionRead::Loaded(projects),
            Err(reason) => CollectionRead::Corrupt { reason },
        })
    }

    async fn append(&self, project: &Project) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut projects = match self.load().await? {
            CollectionRead::Absent => Vec::new(),
            CollectionRead::Loaded(projects) => projects,
            CollectionRead::Corrupt { reason } => {
                warn!(
                    path = %self.path.display(),
                    %reason,
                    id = %project.id,
                    "refusing to append to a corrupt collection"
                );
                return Err(StoreError::CorruptCollection {
                    path: self.path.clone(),
                    reason,
                });
            }
        };

        if projects.iter().any(|p| p.id == project.id) {
            return Err(StoreError::DuplicateId(project.id.clone()));
        }
        projects.push(project.clone());

        let bytes = encode_collection(&projects)?;
        write_atomic(&self.path, bytes).await?;

        debug!(id = %project.id, records = projects.len(), "appended project");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Encoding and atomic file replacement
// ---------------------------------------------------------------------------

/// Parse collection bytes. Whitespace-only content is an empty collection.
pub(crate) fn parse_collection(bytes: &[u8]) -> Result<Vec<Project>, String> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(bytes).map_err(|e| e.to_string())
}

/// Pretty-printed JSON array, two-space indented.
pub(crate) fn encode_collection(projects: &[Project]) -> StoreResult<Vec<u8>> {
    serde_json::to_vec_pretty(projects).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Replace `path` with `bytes` via temp file, fsync and rename.
pub(crate) async fn write_atomic(path: &Path, bytes: Vec<u8>) -> StoreResult<()> {
    let path = path.to_path_buf();
    run_blocking(move || {
        let tmp = staged_temp_file(&path, &bytes)?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    })
    .await
}

/// Like [`write_atomic`] but never replaces an existing file.
///
/// Returns `true` if the file was created, `false` if it already existed.
pub(crate) async fn create_atomic(path: &Path, bytes: Vec<u8>) -> StoreResult<bool> {
    let path = path.to_path_buf();
    run_blocking(move || {
        if path.exists() {
            return Ok(false);
        }
        let tmp = staged_temp_file(&path, &bytes)?;
        match tmp.persist_noclobber(&path) {
            Ok(_) => Ok(true),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.error.into()),
        }
    })
    .await
}

fn staged_temp_file(path: &Path, bytes: &[u8]) -> io::Result<tempfile::NamedTempFile> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".projects-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

async fn run_blocking<T, F>(f: F) -> StoreResult<T>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Io(io::Error::other(e)))?
}
