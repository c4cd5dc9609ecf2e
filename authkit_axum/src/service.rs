//! User authentication service: registration, per-user sessions and
//! password reset, backed by [`authkit::CredentialService`]

use axum::{
    Form, Json, Router,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use http::{HeaderMap, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use authkit::{AuthContext, get_cookie, header_set_cookie};

use super::error::{ApiError, IntoResponseError, error_body};

pub(crate) fn router(context: AuthContext) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/users", post(users))
        .route("/sessions", post(login).delete(logout))
        .route("/profile", get(profile))
        .route(
            "/reset_password",
            post(get_reset_password_token).put(update_password),
        )
        .with_state(context)
}

#[derive(Debug, Deserialize)]
struct CredentialsForm {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct ResetRequestForm {
    email: String,
}

#[derive(Debug, Deserialize)]
struct UpdatePasswordForm {
    email: String,
    reset_token: String,
    new_password: String,
}

async fn index() -> Json<Value> {
    Json(json!({ "message": "Bienvenue" }))
}

async fn users(
    State(context): State<AuthContext>,
    Form(form): Form<CredentialsForm>,
) -> Result<Json<Value>, ApiError> {
    let user = context
        .credentials
        .register_user(&form.email, &form.password)
        .await
        .into_response_error()?;
    Ok(Json(json!({ "email": user.email, "message": "user created" })))
}

async fn login(
    State(context): State<AuthContext>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, ApiError> {
    let session_id = context
        .credentials
        .log_in(&form.email, &form.password)
        .await
        .into_response_error()?;

    let mut headers = HeaderMap::new();
    header_set_cookie(&mut headers, &context.config.session_name, &session_id, None)
        .into_response_error()?;

    Ok((
        headers,
        Json(json!({ "email": form.email, "message": "logged in" })),
    )
        .into_response())
}

async fn logout(
    State(context): State<AuthContext>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session_id = get_cookie(&headers, &context.config.session_name);
    let user = context
        .credentials
        .get_user_from_session_id(session_id)
        .await
        .ok_or_else(|| error_body(StatusCode::FORBIDDEN))?;

    context
        .credentials
        .destroy_session(&user.id)
        .await
        .into_response_error()?;

    let mut headers = HeaderMap::new();
    header_set_cookie(&mut headers, &context.config.session_name, "", Some(-1))
        .into_response_error()?;

    Ok((headers, Redirect::to("/")).into_response())
}

async fn profile(
    State(context): State<AuthContext>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let session_id = get_cookie(&headers, &context.config.session_name);
    let user = context
        .credentials
        .get_user_from_session_id(session_id)
        .await
        .ok_or_else(|| error_body(StatusCode::FORBIDDEN))?;
    Ok(Json(json!({ "email": user.email })))
}

async fn get_reset_password_token(
    State(context): State<AuthContext>,
    Form(form): Form<ResetRequestForm>,
) -> Result<Json<Value>, ApiError> {
    let token = context
        .credentials
        .get_reset_password_token(&form.email)
        .await
        .into_response_error()?;
    Ok(Json(json!({ "email": form.email, "reset_token": token })))
}

async fn update_password(
    State(context): State<AuthContext>,
    Form(form): Form<UpdatePasswordForm>,
) -> Result<Json<Value>, ApiError> {
    context
        .credentials
        .update_password(&form.reset_token, &form.new_password)
        .await
        .into_response_error()?;
    Ok(Json(
        json!({ "email": form.email, "message": "Password updated" }),
    ))
}
