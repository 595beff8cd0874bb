//! Filesystem persistence for Folio.
//!
//! Two kinds of data live on disk:
//!
//! - **Blobs** -- one image file per project, `<blob_dir>/<id>.<ext>`,
//!   decoded from the inline payload the upload form sends.
//! - **The collection** -- every [`Project`](folio_types::Project) in one
//!   JSON array, rewritten wholesale on each append.
//!
//! # Components
//!
//! - [`StoreLayout`] -- where things live; [`StoreLayout::ensure`] bootstraps them
//! - [`decode_payload`] -- inline `data:` payload to raw bytes
//! - [`BlobStore`] -- writes and resolves image blobs
//! - [`ProjectStore`] -- append/list contract for the collection, with
//!   [`FileProjectStore`] and [`InMemoryProjectStore`] backends
//!
//! # Design Rules
//!
//! 1. Write the blob, then append the record. Never the reverse.
//! 2. Appends are linearized by the store; no update is lost.
//! 3. The collection file is replaced by atomic rename, never truncated in place.
//! 4. A collection that fails to parse is reported and left untouched.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod blob;
pub mod error;
pub mod file;
pub mod layout;
pub mod memory;
pub mod payload;
pub mod traits;

pub use blob::{content_type_for, BlobStore, StoredBlob, DEFAULT_MAX_IMAGE_BYTES};
pub use error::{StoreError, StoreResult};
pub use file::FileProjectStore;
pub use layout::StoreLayout;
pub use memory::InMemoryProjectStore;
pub use payload::{decode_payload, DecodedImage};
pub use traits::{CollectionRead, ProjectStore};
