use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use folio_sdk::PortfolioError;
use folio_store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Portfolio(#[from] PortfolioError),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        Self::Portfolio(e.into())
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Portfolio(PortfolioError::Validation { .. }) => StatusCode::BAD_REQUEST,
            Self::Portfolio(PortfolioError::Store(store)) => match store {
                StoreError::Payload(_) => StatusCode::UNPROCESSABLE_ENTITY,
                StoreError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                StoreError::DuplicateId(_) => StatusCode::CONFLICT,
                StoreError::BlobNotFound(_) => StatusCode::NOT_FOUND,
                StoreError::CorruptCollection { .. }
                | StoreError::Serialization(_)
                | StoreError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::ProjectNotFound(_) => StatusCode::NOT_FOUND,
            Self::Portfolio(PortfolioError::Config(_))
            | Self::Config(_)
            | Self::Io(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
