//! Combined router for the API and the user authentication service

use axum::Router;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use authkit::AuthContext;

use super::error::not_found;

/// Create the application router
///
/// Mounts the gated `/api/v1` endpoints and the user authentication service
/// at the root, with JSON 404s and HTTP tracing.
pub fn authkit_router(context: AuthContext) -> Router {
    authkit_router_no_trace(context).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`authkit_router`] without the HTTP tracing middleware
pub fn authkit_router_no_trace(context: AuthContext) -> Router {
    Router::new()
        .merge(super::api::router(context.clone()))
        .merge(super::service::router(context))
        .fallback(not_found)
}
