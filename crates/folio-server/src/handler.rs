use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json};
use folio_sdk::{Portfolio, Project, ProjectFields, ProjectId};
use serde::Deserialize;
use serde_json::json;

use crate::error::{ServerError, ServerResult};

/// Body of `POST /v1/projects`, as sent by the upload form.
///
/// Missing keys deserialize as empty so they surface as validation errors
/// naming the field.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmitRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub github: Option<String>,
    pub demo: Option<String>,
    /// Inline image payload, usually a `data:image/...;base64,` URL.
    pub image_base64: String,
}

impl SubmitRequest {
    fn into_parts(self) -> (ProjectFields, String) {
        let fields = ProjectFields {
            title: self.title,
            description: self.description,
            category: self.category,
            github: self.github,
            demo: self.demo,
        };
        (fields, self.image_base64)
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "name": "folio-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn list_projects(
    State(portfolio): State<Portfolio>,
) -> ServerResult<Json<Vec<Project>>> {
    Ok(Json(portfolio.projects().await?))
}

pub async fn get_project(
    State(portfolio): State<Portfolio>,
    Path(id): Path<String>,
) -> ServerResult<Json<Project>> {
    let parsed =
        ProjectId::parse(id.clone()).map_err(|_| ServerError::ProjectNotFound(id.clone()))?;
    portfolio
        .project(&parsed)
        .await?
        .map(Json)
        .ok_or(ServerError::ProjectNotFound(id))
}

pub async fn submit_project(
    State(portfolio): State<Portfolio>,
    Json(request): Json<SubmitRequest>,
) -> ServerResult<(StatusCode, Json<Project>)> {
    let (fields, image) = request.into_parts();
    let project = portfolio.submit(fields, &image).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_blob(
    State(portfolio): State<Portfolio>,
    Path(file): Path<String>,
) -> ServerResult<impl IntoResponse> {
    let (bytes, content_type) = portfolio.blobs().read(&file).await?;
    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}
