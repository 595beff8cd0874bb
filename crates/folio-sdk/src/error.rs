use thiserror::Error;

use crate::validation::RequiredField;

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("missing required field: {field}")]
    Validation { field: RequiredField },

    #[error(transparent)]
    Store(#[from] folio_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type PortfolioResult<T> = Result<T, PortfolioError>;
