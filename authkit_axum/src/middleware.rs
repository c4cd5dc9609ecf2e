use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::StatusCode;
use std::sync::LazyLock;

use authkit::{AuthContext, ExcludedPath};

use super::error::error_page;
use super::user::CurrentUser;

/// API paths reachable without authentication
pub static API_EXCLUDED_PATHS: LazyLock<Vec<ExcludedPath>> = LazyLock::new(|| {
    ExcludedPath::parse_all([
        "/api/v1/status/",
        "/api/v1/unauthorized/",
        "/api/v1/forbidden/",
        "/api/v1/auth_session/login/",
    ])
});

/// Request gate run before every API handler
///
/// Without a configured strategy every request passes. Otherwise a guarded
/// path needs an `Authorization` header or a session cookie (401), and the
/// strategy must resolve a user from it (403). The user is then available to
/// handlers as [`CurrentUser`].
pub async fn auth_gate(State(context): State<AuthContext>, req: Request, next: Next) -> Response {
    let Some(strategy) = context.strategy.clone() else {
        return next.run(req).await;
    };

    let (mut parts, body) = req.into_parts();

    if !strategy.require_auth(Some(parts.uri.path()), &API_EXCLUDED_PATHS) {
        return next.run(Request::from_parts(parts, body)).await;
    }

    if strategy.authorization_header(&parts).is_none() && strategy.session_cookie(&parts).is_none()
    {
        tracing::debug!(path = %parts.uri.path(), "No credentials on a guarded path");
        return error_page(StatusCode::UNAUTHORIZED);
    }

    let Some(user) = strategy.current_user(&parts).await else {
        tracing::debug!(path = %parts.uri.path(), "Credentials did not resolve a user");
        return error_page(StatusCode::FORBIDDEN);
    };

    tracing::debug!(user_id = %user.id, strategy = strategy.name(), "Request authenticated");
    parts.extensions.insert(CurrentUser(user));
    next.run(Request::from_parts(parts, body)).await
}
