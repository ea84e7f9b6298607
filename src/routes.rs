//! Router assembly.

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Build the application router: the single stats endpoint plus a JSON 404
/// fallback covering unknown paths and non-GET methods alike.
///
/// The trailing-slash alias is explicit; axum does not normalize paths.
pub fn build_routes() -> Router {
    let stats = get(handlers::collection_stats).fallback(handlers::endpoint_not_found);

    Router::new()
        .route("/stats", stats.clone())
        .route("/stats/", stats)
        .fallback(handlers::endpoint_not_found)
        .layer(TraceLayer::new_for_http())
}
