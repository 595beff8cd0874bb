//! HTTP interface for Folio.
//!
//! Exposes the portfolio to the site's upload form and page renderer:
//!
//! | Route                     | Purpose                          |
//! |---------------------------|----------------------------------|
//! | `GET  /v1/health`         | liveness                         |
//! | `GET  /v1/projects`       | full collection, oldest first    |
//! | `POST /v1/projects`       | submit a project (201 + record)  |
//! | `GET  /v1/projects/:id`   | single record                    |
//! | `GET  <prefix>/:file`     | image blob with its content type |
//!
//! Errors are returned as `{"error": "..."}` with a status derived from
//! the error kind.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::SubmitRequest;
pub use router::build_router;
pub use server::FolioServer;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use folio_sdk::{Portfolio, PortfolioConfig, Project};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    async fn app(root: &std::path::Path, max_image_bytes: u64) -> Router {
        let config = PortfolioConfig {
            max_image_bytes,
            ..PortfolioConfig::rooted_at(root)
        };
        let portfolio = Portfolio::open(&config).await.unwrap();
        build_router(portfolio, config::body_limit_for(max_image_bytes))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    fn submission(image: &[u8]) -> Value {
        json!({
            "title": "Nav Robot",
            "description": "Autonomous indoor navigation",
            "category": "robotics",
            "github": "",
            "imageBase64": format!("data:image/png;base64,{}", STANDARD.encode(image)),
        })
    }

    #[tokio::test]
    async fn health_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path(), 1024)
            .await
            .oneshot(get("/v1/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn empty_collection_lists_as_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path(), 1024)
            .await
            .oneshot(get("/v1/projects"))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(body_bytes(response).await, b"[]");
    }

    #[tokio::test]
    async fn submit_list_and_fetch_image() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path(), 1024).await;

        let response = app
            .clone()
            .oneshot(post_json("/v1/projects", &submission(b"fake png bytes")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Project = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(created.title, "Nav Robot");
        assert_eq!(created.github, None);

        let response = app.clone().oneshot(get("/v1/projects")).await.unwrap();
        let listed: Vec<Project> = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(listed, vec![created.clone()]);

        let response = app
            .clone()
            .oneshot(get(&format!("/v1/projects/{}", created.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let response = app.oneshot(get(&created.image)).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(body_bytes(response).await, b"fake png bytes");
    }

    #[tokio::test]
    async fn missing_field_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let mut body = submission(b"img");
        body.as_object_mut().unwrap().remove("title");

        let response = app(dir.path(), 1024)
            .await
            .oneshot(post_json("/v1/projects", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error["error"], "missing required field: title");
    }

    #[tokio::test]
    async fn oversized_image_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path(), 16)
            .await
            .oneshot(post_json("/v1/projects", &submission(&[0u8; 17])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn malformed_payload_is_unprocessable() {
        let dir = tempfile::tempdir().unwrap();
        let mut body = submission(b"img");
        body["imageBase64"] = json!("data:image/png;base64,@@@@");
        let response = app(dir.path(), 1024)
            .await
            .oneshot(post_json("/v1/projects", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unknown_project_and_blob_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path(), 1024).await;

        let response = app.clone().oneshot(get("/v1/projects/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.oneshot(get("/projects/nope.png")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn corrupt_collection_lists_empty_but_refuses_submissions() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path(), 1024).await;
        let collection = dir.path().join("public/data/projects.json");
        std::fs::write(&collection, "[{").unwrap();

        let response = app.clone().oneshot(get("/v1/projects")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(body_bytes(response).await, b"[]");

        let response = app
            .oneshot(post_json("/v1/projects", &submission(b"img")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(std::fs::read_to_string(&collection).unwrap(), "[{");
    }
}
