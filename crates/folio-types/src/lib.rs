//! Foundation types for Folio.
//!
//! Folio persists the projects shown on a portfolio site: a flat, ordered
//! collection of [`Project`] records plus one image blob per record. This
//! crate holds the data model shared by every other Folio crate.
//!
//! # Key Types
//!
//! - [`ProjectId`] -- opaque, filesystem-safe record identifier
//! - [`IdGenerator`] -- source of fresh identifiers ([`TimeOrderedIds`], [`SequentialIds`])
//! - [`Project`] -- the unit of persistence
//! - [`ProjectFields`] -- caller-supplied fields of a submission

pub mod error;
pub mod id;
pub mod project;

pub use error::TypeError;
pub use id::{IdGenerator, ProjectId, SequentialIds, TimeOrderedIds};
pub use project::{Project, ProjectFields};
