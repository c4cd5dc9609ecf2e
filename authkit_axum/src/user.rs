use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::response::Response;
use http::{StatusCode, request::Parts};
use std::convert::Infallible;
use std::ops::Deref;

use authkit::User;

use super::error::error_page;

/// Principal resolved by the request gate
///
/// The gate stores it in request extensions. As an extractor it rejects with
/// 401 when the request was not authenticated.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or_else(|| {
            tracing::debug!("No authenticated user on the request");
            error_page(StatusCode::UNAUTHORIZED)
        })
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().cloned())
    }
}
