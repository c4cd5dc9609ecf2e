//! `/api/v1` endpoints

use axum::{
    Form, Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use http::{HeaderMap, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use authkit::{
    AuthContext, User, UserSearchField, UserStore, header_set_cookie, verify_password_blocking,
};

use super::error::{ApiError, IntoResponseError, error_body, error_message};
use super::middleware::auth_gate;
use super::user::CurrentUser;

pub(crate) fn router(context: AuthContext) -> Router {
    Router::new()
        .route("/api/v1/status", get(status))
        .route("/api/v1/unauthorized", get(unauthorized))
        .route("/api/v1/forbidden", get(forbidden))
        .route("/api/v1/stats", get(stats))
        .route("/api/v1/users/me", get(me))
        .route("/api/v1/auth_session/login", post(login))
        .route("/api/v1/auth_session/logout", delete(logout))
        .layer(from_fn_with_state(context.clone(), auth_gate))
        .with_state(context)
}

async fn status() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

async fn unauthorized() -> ApiError {
    error_body(StatusCode::UNAUTHORIZED)
}

async fn forbidden() -> ApiError {
    error_body(StatusCode::FORBIDDEN)
}

async fn stats(State(context): State<AuthContext>) -> Result<Json<Value>, ApiError> {
    let users = context.users.count().await.map_err(|e| {
        tracing::error!("Failed to count users: {}", e);
        error_body(StatusCode::INTERNAL_SERVER_ERROR)
    })?;
    Ok(Json(json!({ "users": users })))
}

/// Without a strategy there is never a current user, hence 404
async fn me(user: Option<CurrentUser>) -> Result<Json<User>, ApiError> {
    let CurrentUser(user) = user.ok_or_else(|| error_body(StatusCode::NOT_FOUND))?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    email: Option<String>,
    password: Option<String>,
}

async fn login(
    State(context): State<AuthContext>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let email = form
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| error_message(StatusCode::BAD_REQUEST, "email missing"))?;
    let password = form
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| error_message(StatusCode::BAD_REQUEST, "password missing"))?;

    let user = context
        .users
        .find_one(&UserSearchField::Email(email))
        .await
        .map_err(|e| {
            tracing::error!("User lookup failed: {}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR)
        })?
        .ok_or_else(|| error_message(StatusCode::NOT_FOUND, "no user found for this email"))?;

    if !verify_password_blocking(&password, &user.hashed_password).await {
        return Err(error_message(StatusCode::UNAUTHORIZED, "wrong password"));
    }

    let session_id = context
        .sessions
        .create_session(Some(user.id.as_str()))
        .await
        .ok_or_else(|| error_body(StatusCode::INTERNAL_SERVER_ERROR))?;

    let duration = context.sessions.session_duration();
    let mut headers = HeaderMap::new();
    header_set_cookie(
        &mut headers,
        context.sessions.cookie_name(),
        &session_id,
        (duration > 0).then_some(duration),
    )
    .into_response_error()?;

    Ok((headers, Json(user)).into_response())
}

async fn logout(State(context): State<AuthContext>, headers: HeaderMap) -> ApiError {
    if !context.sessions.destroy_session(&headers).await {
        return error_body(StatusCode::NOT_FOUND);
    }
    (StatusCode::OK, Json(json!({})))
}
