//! High-level API for Folio.
//!
//! [`Portfolio`] is the entry point: it bootstraps storage, validates and
//! assembles submitted projects, and answers collection queries. Rendering,
//! redirects and cache invalidation are left to the caller, which reacts to
//! the returned result.

pub mod config;
pub mod error;
pub mod portfolio;
pub mod validation;

pub use config::{PortfolioConfig, API_PREFIX};
pub use error::{PortfolioError, PortfolioResult};
pub use portfolio::Portfolio;
pub use validation::{validate_submission, RequiredField};

// Re-export key types
pub use folio_types::{Project, ProjectFields, ProjectId};
pub use folio_store::{CollectionRead, StoreError};
