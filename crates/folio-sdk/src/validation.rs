use std::fmt;

use folio_types::ProjectFields;

use crate::error::{PortfolioError, PortfolioResult};

/// A field every submission must carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequiredField {
    Title,
    Description,
    Category,
    Image,
}

impl RequiredField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Category => "category",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural check of a submission.
///
/// Every required field must contain something other than whitespace. The
/// first missing field is reported, in the order title, description,
/// category, image. The payload itself is only decoded later, when the
/// blob is written.
pub fn validate_submission(fields: &ProjectFields, encoded_image: &str) -> PortfolioResult<()> {
    let required = [
        (RequiredField::Title, fields.title.as_str()),
        (RequiredField::Description, fields.description.as_str()),
        (RequiredField::Category, fields.category.as_str()),
        (RequiredField::Image, encoded_image),
    ];
    match required.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((field, _)) => Err(PortfolioError::Validation { field: *field }),
        None => Ok(()),
    }
}
