//! Authentication strategies guarding the API
//!
//! A strategy decides whether a path needs a principal and resolves one from
//! the request: nobody ([`NullAuth`]), Basic credentials ([`BasicAuth`]) or a
//! session cookie ([`SessionAuth`]).

mod basic;
mod path;
mod session;
mod strategy;

pub use basic::{
    BasicAuth, decode_base64_authorization_header, extract_base64_authorization_header,
    extract_user_credentials,
};
pub use path::{ExcludedPath, require_auth};
pub use session::SessionAuth;
pub use strategy::{AuthStrategy, NullAuth, Strategy};
