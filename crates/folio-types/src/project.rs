use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::ProjectId;

/// A single portfolio entry, the unit of persistence.
///
/// Serialized with camelCase keys (`createdAt`). `github` and `demo` are
/// omitted from the JSON entirely when absent; an empty string is never
/// stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Public reference to the image blob, derived from `id`.
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
    /// Submission time. Display only; collection order is append order.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Assemble a record from submitted fields and the stored image reference.
    pub fn from_fields(
        id: ProjectId,
        fields: ProjectFields,
        image: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let fields = fields.normalized();
        Self {
            id,
            title: fields.title,
            description: fields.description,
            category: fields.category,
            image: image.into(),
            github: fields.github,
            demo: fields.demo,
            created_at,
        }
    }
}

/// Caller-supplied fields of a project submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFields {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub demo: Option<String>,
}

impl ProjectFields {
    /// Fields with the three required values and no links.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: category.into(),
            github: None,
            demo: None,
        }
    }

    pub fn with_github(mut self, url: impl Into<String>) -> Self {
        self.github = Some(url.into());
        self
    }

    pub fn with_demo(mut self, url: impl Into<String>) -> Self {
        self.demo = Some(url.into());
        self
    }

    /// Blank optional links become `None`; present links are trimmed.
    pub fn normalized(mut self) -> Self {
        self.github = normalize_link(self.github);
        self.demo = normalize_link(self.demo);
        self
    }
}

fn normalize_link(link: Option<String>) -> Option<String> {
    link.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
