use std::sync::Arc;

use chrono::Utc;
use folio_store::{BlobStore, CollectionRead, FileProjectStore, ProjectStore};
use folio_types::{IdGenerator, Project, ProjectFields, ProjectId, TimeOrderedIds};
use tracing::{debug, info, warn};

use crate::config::PortfolioConfig;
use crate::error::PortfolioResult;
use crate::validation::validate_submission;

/// High-level portfolio API.
///
/// Cheap to share: clone it or put it behind an `Arc`. All clones append
/// through the same store, so their submissions are linearized.
#[derive(Clone)]
pub struct Portfolio {
    store: Arc<dyn ProjectStore>,
    blobs: BlobStore,
    ids: Arc<dyn IdGenerator>,
}

impl Portfolio {
    /// Bootstrap the configured layout and open the file-backed store.
    pub async fn open(config: &PortfolioConfig) -> PortfolioResult<Self> {
        config.validate()?;
        let layout = config.layout();
        layout.ensure().await?;

        info!(
            collection = %layout.collection_file().display(),
            blobs = %layout.blob_dir().display(),
            "portfolio opened"
        );
        Ok(Self::with_parts(
            Arc::new(FileProjectStore::new(layout.collection_file())),
            config.blob_store(),
            Arc::new(TimeOrderedIds),
        ))
    }

    /// Assemble from explicit components. The caller is responsible for
    /// having bootstrapped the blob directory.
    pub fn with_parts(
        store: Arc<dyn ProjectStore>,
        blobs: BlobStore,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self { store, blobs, ids }
    }

    // ---- Submission ----

    /// Validate, store the image, and append a new project.
    ///
    /// The blob is written before the record is appended. If the append
    /// fails the blob stays on disk as an orphan and the error is returned;
    /// calling `submit` again with the same input is safe and stores a
    /// fresh blob under a new id.
    pub async fn submit(
        &self,
        fields: ProjectFields,
        encoded_image: &str,
    ) -> PortfolioResult<Project> {
        validate_submission(&fields, encoded_image)?;

        let id = self.ids.next_id();
        let blob = self.blobs.write(encoded_image, &id).await?;
        let project = Project::from_fields(id, fields, blob.public_path.clone(), Utc::now());

        if let Err(e) = self.store.append(&project).await {
            warn!(
                id = %project.id,
                orphan = %blob.path.display(),
                error = %e,
                "append failed after blob write; blob left orphaned"
            );
            return Err(e.into());
        }

        info!(
            id = %project.id,
            category = %project.category,
            size = blob.size,
            "project submitted"
        );
        Ok(project)
    }

    // ---- Queries ----

    /// Every project in submission order, oldest first.
    ///
    /// Empty when nothing has been submitted yet or when the collection is
    /// unreadable; use [`Portfolio::load`] to tell those apart.
    pub async fn projects(&self) -> PortfolioResult<Vec<Project>> {
        let projects = self.store.list().await?;
        debug!(count = projects.len(), "listed projects");
        Ok(projects)
    }

    pub async fn project(&self, id: &ProjectId) -> PortfolioResult<Option<Project>> {
        Ok(self.store.get(id).await?)
    }

    /// Raw collection state, including absent and corrupt collections.
    pub async fn load(&self) -> PortfolioResult<CollectionRead> {
        Ok(self.store.load().await?)
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }
}

impl std::fmt::Debug for Portfolio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Portfolio")
            .field("blob_dir", &self.blobs.dir())
            .field("public_prefix", &self.blobs.public_prefix())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PortfolioError;
    use crate::validation::RequiredField;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use folio_store::{InMemoryProjectStore, StoreError};
    use folio_types::SequentialIds;
    use std::collections::HashSet;
    use std::path::Path;

    fn png(bytes: &[u8]) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(bytes))
    }

    fn blob_count(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    async fn open(dir: &Path) -> Portfolio {
        Portfolio::open(&PortfolioConfig::rooted_at(dir)).await.unwrap()
    }

    // -----------------------------------------------------------------------
    // Happy path
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn fresh_portfolio_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let portfolio = open(dir.path()).await;

        assert!(portfolio.projects().await.unwrap().is_empty());
        assert_eq!(portfolio.load().await.unwrap(), CollectionRead::Loaded(vec![]));
        let file = dir.path().join("public/data/projects.json");
        let parsed: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(file).unwrap()).unwrap();
        assert!(parsed.is_empty());
    }

    #[tokio::test]
    async fn nav_robot_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let portfolio = open(dir.path()).await;
        let image = [0x5au8; 50];

        let fields = ProjectFields::new("Nav Robot", "...", "robotics");
        let project = portfolio.submit(fields.clone(), &png(&image)).await.unwrap();

        assert_eq!(project.title, "Nav Robot");
        assert_eq!(project.description, "...");
        assert_eq!(project.category, "robotics");
        assert_eq!(project.github, None);
        assert_eq!(project.demo, None);
        assert_eq!(project.image, format!("/projects/{}.png", project.id));

        let path = portfolio.blobs().resolve(&project.image).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), image);

        let listed = portfolio.projects().await.unwrap();
        assert_eq!(listed.iter().filter(|p| p.id == project.id).count(), 1);
        assert_eq!(listed.last(), Some(&project));

        let raw = std::fs::read_to_string(dir.path().join("public/data/projects.json")).unwrap();
        assert!(!raw.contains("\"github\""));
        assert!(!raw.contains("\"demo\""));
    }

    #[tokio::test]
    async fn links_are_kept_when_given_and_dropped_when_blank() {
        let dir = tempfile::tempdir().unwrap();
        let portfolio = open(dir.path()).await;

        let fields = ProjectFields::new("t", "d", "c")
            .with_github("https://github.com/example/nav")
            .with_demo("");
        let project = portfolio.submit(fields, &png(b"img")).await.unwrap();
        assert_eq!(project.github.as_deref(), Some("https://github.com/example/nav"));
        assert_eq!(project.demo, None);

        let found = portfolio.project(&project.id).await.unwrap();
        assert_eq!(found, Some(project));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_submissions_get_distinct_ids() {
        let dir = tempfile::tempdir().unwrap();
        let portfolio = open(dir.path()).await;

        let tasks: Vec<_> = (0..24)
            .map(|i| {
                let portfolio = portfolio.clone();
                tokio::spawn(async move {
                    let fields = ProjectFields::new(format!("p{i}"), "d", "c");
                    portfolio.submit(fields, &png(&[i as u8; 8])).await
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for t in tasks {
            ids.insert(t.await.unwrap().unwrap().id);
        }
        assert_eq!(ids.len(), 24);

        let listed = portfolio.projects().await.unwrap();
        assert_eq!(listed.len(), 24);
        assert_eq!(blob_count(portfolio.blobs().dir()), 24);
    }

    // -----------------------------------------------------------------------
    // Failures
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn validation_failure_has_no_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let portfolio = open(dir.path()).await;

        let err = portfolio
            .submit(ProjectFields::new("t", "d", ""), &png(b"img"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PortfolioError::Validation { field: RequiredField::Category }
        ));

        let err = portfolio
            .submit(ProjectFields::new("t", "d", "c"), "")
            .await
            .unwrap_err();
        assert!(matches!(err, PortfolioError::Validation { field: RequiredField::Image }));

        assert_eq!(blob_count(portfolio.blobs().dir()), 0);
        assert!(portfolio.projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bad_payload_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = PortfolioConfig {
            max_image_bytes: 16,
            ..PortfolioConfig::rooted_at(dir.path())
        };
        let portfolio = Portfolio::open(&config).await.unwrap();

        let err = portfolio
            .submit(ProjectFields::new("t", "d", "c"), &png(&[1u8; 17]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PortfolioError::Store(StoreError::PayloadTooLarge { size: 17, limit: 16 })
        ));

        let err = portfolio
            .submit(ProjectFields::new("t", "d", "c"), "data:text/plain;base64,aGk=")
            .await
            .unwrap_err();
        assert!(matches!(err, PortfolioError::Store(StoreError::Payload(_))));

        assert_eq!(blob_count(portfolio.blobs().dir()), 0);
        assert!(portfolio.projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_append_leaves_orphan_and_retry_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let portfolio = open(dir.path()).await;
        let collection = dir.path().join("public/data/projects.json");
        std::fs::write(&collection, "{ broken").unwrap();

        let fields = ProjectFields::new("t", "d", "c");
        let err = portfolio.submit(fields.clone(), &png(b"img")).await.unwrap_err();
        assert!(matches!(
            err,
            PortfolioError::Store(StoreError::CorruptCollection { .. })
        ));
        assert_eq!(std::fs::read_to_string(&collection).unwrap(), "{ broken");
        assert_eq!(blob_count(portfolio.blobs().dir()), 1);

        // Operator repairs the file; the caller retries with the same input.
        std::fs::write(&collection, "[]").unwrap();
        let project = portfolio.submit(fields, &png(b"img")).await.unwrap();
        assert_eq!(portfolio.projects().await.unwrap(), vec![project]);
        assert_eq!(blob_count(portfolio.blobs().dir()), 2);
    }

    #[tokio::test]
    async fn duplicate_id_keeps_the_stored_project_intact() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryProjectStore::new());
        let blobs = BlobStore::new(dir.path(), "/projects");

        let first = Portfolio::with_parts(
            store.clone(),
            blobs.clone(),
            Arc::new(SequentialIds::new("p")),
        );
        let second = Portfolio::with_parts(store.clone(), blobs, Arc::new(SequentialIds::new("p")));

        let saved = first
            .submit(ProjectFields::new("a", "d", "c"), &png(b"FIRST"))
            .await
            .unwrap();
        let err = second
            .submit(ProjectFields::new("b", "d", "c"), &png(b"SECOND"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortfolioError::Store(StoreError::DuplicateId(_))));

        assert_eq!(store.len(), 1);
        assert_eq!(first.projects().await.unwrap(), vec![saved.clone()]);
        let path = first.blobs().resolve(&saved.image).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"FIRST");
        assert_eq!(blob_count(dir.path()), 1);
    }

    #[tokio::test]
    async fn open_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = PortfolioConfig {
            max_image_bytes: 0,
            ..PortfolioConfig::rooted_at(dir.path())
        };
        let err = Portfolio::open(&config).await.unwrap_err();
        assert!(matches!(err, PortfolioError::Config(_)));
    }
}
