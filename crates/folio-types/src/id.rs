use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Longest identifier accepted when parsing.
const MAX_ID_LEN: usize = 128;

/// Opaque identifier of a project record.
///
/// Ids double as blob file stems, so they are restricted to ASCII
/// alphanumerics, `-` and `_`. Collections written by earlier deployments
/// used millisecond timestamps (`"1712345678901"`); those still parse.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(String);

impl ProjectId {
    /// Parse and validate an identifier.
    pub fn parse(s: impl Into<String>) -> Result<Self, TypeError> {
        let s = s.into();
        if s.is_empty() {
            return Err(TypeError::EmptyId);
        }
        if s.len() > MAX_ID_LEN {
            return Err(TypeError::InvalidId {
                reason: format!("longer than {MAX_ID_LEN} characters"),
                id: s,
            });
        }
        let bad = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'));
        if let Some(c) = bad {
            return Err(TypeError::InvalidId {
                reason: format!("unexpected character {c:?}"),
                id: s,
            });
        }
        Ok(Self(s))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectId({})", self.0)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProjectId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ProjectId> for String {
    fn from(id: ProjectId) -> Self {
        id.0
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Source of fresh project identifiers.
///
/// Implementations must never hand out the same id twice to a single
/// caller, including for calls made within the same clock tick.
pub trait IdGenerator: Send + Sync {
    /// Produce the next identifier.
    fn next_id(&self) -> ProjectId;
}

/// UUID v7 identifiers: millisecond timestamp followed by random bits.
///
/// Ids sort roughly by creation time while two calls in the same
/// millisecond still differ in their 74 random bits.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeOrderedIds;

impl IdGenerator for TimeOrderedIds {
    fn next_id(&self) -> ProjectId {
        ProjectId(uuid::Uuid::now_v7().to_string())
    }
}

/// Deterministic `<prefix>-<n>` identifiers from an atomic counter.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    /// Counter starting at 1 with the given prefix.
    ///
    /// The prefix is sanitized to the characters `ProjectId` accepts.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    /// Counter starting at `first`.
    pub fn starting_at(prefix: impl Into<String>, first: u64) -> Self {
        let prefix: String = prefix
            .into()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        Self {
            prefix,
            next: AtomicU64::new(first),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> ProjectId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        if self.prefix.is_empty() {
            ProjectId(n.to_string())
        } else {
            ProjectId(format!("{}-{n}", self.prefix))
        }
    }
}
