use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use folio_sdk::Portfolio;
use tower_http::trace::TraceLayer;

use crate::handler;

/// Build the axum router with all Folio endpoints.
///
/// Blobs are served under the portfolio's public prefix so stored `image`
/// references resolve as-is. The prefix must have passed
/// [`PortfolioConfig::validate`](folio_sdk::PortfolioConfig::validate);
/// one that overlaps the API routes makes axum panic here.
pub fn build_router(portfolio: Portfolio, body_limit: usize) -> Router {
    let blob_route = format!("{}/:file", portfolio.blobs().public_prefix());
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route(
            "/v1/projects",
            get(handler::list_projects).post(handler::submit_project),
        )
        .route("/v1/projects/:id", get(handler::get_project))
        .route(&blob_route, get(handler::get_blob))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(portfolio)
}
