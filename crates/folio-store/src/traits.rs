use async_trait::async_trait;
use folio_types::{Project, ProjectId};
use tracing::warn;

use crate::error::StoreResult;

/// Outcome of reading the collection without losing information.
///
/// Keeps "nothing stored yet" apart from "stored data did not parse".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CollectionRead {
    /// No collection exists yet.
    Absent,
    /// The collection parsed; records in append order.
    Loaded(Vec<Project>),
    /// The collection exists but could not be parsed. It has not been modified.
    Corrupt { reason: String },
}

impl CollectionRead {
    /// Records, treating absent and corrupt collections as empty.
    pub fn into_projects(self) -> Vec<Project> {
        match self {
            Self::Loaded(projects) => projects,
            Self::Absent | Self::Corrupt { .. } => Vec::new(),
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// Owner of the project collection.
///
/// All implementations must satisfy these invariants:
/// - `append` is linearizable: concurrent appends never lose a record.
/// - Ids are unique; `append` rejects a duplicate with `DuplicateId`.
/// - `list` returns records in append order, oldest first.
/// - Readers observe the collection before or after an append, never a
///   partial write.
/// - A failed read never leads to stored records being overwritten.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Read the collection, distinguishing absent and corrupt states.
    async fn load(&self) -> StoreResult<CollectionRead>;

    /// Append a record to the end of the collection.
    async fn append(&self, project: &Project) -> StoreResult<()>;

    /// All records in append order.
    ///
    /// Absent and corrupt collections both yield an empty list; a corrupt
    /// one is logged. I/O failures are still returned as errors.
    async fn list(&self) -> StoreResult<Vec<Project>> {
        let read = self.load().await?;
        if let CollectionRead::Corrupt { reason } = &read {
            warn!(%reason, "project collection failed to parse; serving an empty list");
        }
        Ok(read.into_projects())
    }

    /// Look up a single record by id.
    async fn get(&self, id: &ProjectId) -> StoreResult<Option<Project>> {
        Ok(self.list().await?.into_iter().find(|p| &p.id == id))
    }
}
