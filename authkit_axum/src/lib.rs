//! authkit-axum - axum integration for the authkit library
//!
//! Provides the request gate, the `/api/v1` endpoints and the user
//! authentication service as a single router.

mod api;
mod error;
mod middleware;
mod router;
mod service;
mod user;

pub use error::{ApiError, IntoResponseError};
pub use middleware::{API_EXCLUDED_PATHS, auth_gate};
pub use router::{authkit_router, authkit_router_no_trace};
pub use user::CurrentUser;

// Re-export what a binary needs to build the router state
pub use authkit::{AuthConfig, AuthContext, init};
