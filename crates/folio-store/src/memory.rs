use std::sync::RwLock;

use async_trait::async_trait;
use folio_types::Project;

use crate::error::{StoreError, StoreResult};
use crate::traits::{CollectionRead, ProjectStore};

/// In-memory project collection.
///
/// Intended for tests and embedding. Records live in a `Vec` behind a
/// `RwLock`; the write lock makes each append atomic.
pub struct InMemoryProjectStore {
    projects: RwLock<Vec<Project>>,
}

impl InMemoryProjectStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(Vec::new()),
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.projects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.projects.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn load(&self) -> StoreResult<CollectionRead> {
        let projects = self.projects.read().expect("lock poisoned");
        Ok(CollectionRead::Loaded(projects.clone()))
    }

    async fn append(&self, project: &Project) -> StoreResult<()> {
        let mut projects = self.projects.write().expect("lock poisoned");
        if projects.iter().any(|p| p.id == project.id) {
            return Err(StoreError::DuplicateId(project.id.clone()));
        }
        projects.push(project.clone());
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryProjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryProjectStore")
            .field("record_count", &self.len())
            .finish()
    }
}
