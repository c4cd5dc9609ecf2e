use async_trait::async_trait;
use http::header::AUTHORIZATION;
use http::request::Parts;
use std::sync::Arc;

use crate::config::{AuthConfig, AuthType, DEFAULT_SESSION_NAME};
use crate::session::SessionLifecycleManager;
use crate::userdb::{User, UserStore};
use crate::utils::get_cookie;

use super::basic::BasicAuth;
use super::path::{self, ExcludedPath};
use super::session::SessionAuth;

/// Resolves the principal behind a request
///
/// Every method absorbs failures: a strategy that cannot make sense of a
/// request answers `None`, never an error.
#[async_trait]
pub trait AuthStrategy: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn require_auth(&self, path: Option<&str>, excluded_paths: &[ExcludedPath]) -> bool {
        path::require_auth(path, excluded_paths)
    }

    /// Raw `Authorization` header value
    fn authorization_header<'a>(&self, parts: &'a Parts) -> Option<&'a str> {
        let value = parts.headers.get(AUTHORIZATION)?;
        match value.to_str() {
            Ok(s) => Some(s),
            Err(_) => {
                tracing::debug!("Authorization header is not valid ASCII");
                None
            }
        }
    }

    fn cookie_name(&self) -> &str {
        DEFAULT_SESSION_NAME
    }

    fn session_cookie<'a>(&self, parts: &'a Parts) -> Option<&'a str> {
        get_cookie(&parts.headers, self.cookie_name())
    }

    async fn current_user(&self, _parts: &Parts) -> Option<User> {
        None
    }
}

/// Paths may require auth, but nobody ever authenticates
#[derive(Debug, Clone, Default)]
pub struct NullAuth;

#[async_trait]
impl AuthStrategy for NullAuth {
    fn name(&self) -> &'static str {
        "auth"
    }
}

/// Builds the strategy selected by [`AuthConfig::auth_type`]
pub struct Strategy;

impl Strategy {
    /// `None` when no strategy is configured, which leaves every path open.
    /// Session strategies resolve through `sessions`, which the caller built
    /// for the same configuration.
    pub fn from_config(
        config: &AuthConfig,
        users: Arc<dyn UserStore>,
        sessions: Arc<SessionLifecycleManager>,
    ) -> Option<Arc<dyn AuthStrategy>> {
        let strategy: Arc<dyn AuthStrategy> = match config.auth_type? {
            AuthType::Auth => Arc::new(NullAuth),
            AuthType::BasicAuth => Arc::new(BasicAuth::new(users)),
            AuthType::SessionAuth | AuthType::SessionExpAuth | AuthType::SessionDbAuth => {
                Arc::new(SessionAuth::new(users, sessions))
            }
        };
        tracing::info!(strategy = strategy.name(), "Authentication strategy selected");
        Some(strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::userdb::InMemoryUserStore;
    use http::Request;

    fn parts_with(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/users/me");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, _) = builder.body(()).expect("request").into_parts();
        parts
    }

    fn config_for(auth_type: &str) -> AuthConfig {
        AuthConfig::from_lookup(|key| (key == "AUTH_TYPE").then(|| auth_type.to_string()))
    }

    #[tokio::test]
    async fn test_null_auth_never_authenticates() {
        // Given a request carrying both kinds of credentials
        let parts = parts_with(&[
            ("Authorization", "Basic QQ=="),
            ("Cookie", "session_id=abc"),
        ]);

        // Then the base strategy sees them but resolves nobody
        let auth = NullAuth;
        assert_eq!(auth.authorization_header(&parts), Some("Basic QQ=="));
        assert_eq!(auth.session_cookie(&parts), Some("abc"));
        assert_eq!(auth.current_user(&parts).await, None);
    }

    #[test]
    fn test_missing_headers() {
        let parts = parts_with(&[]);
        assert_eq!(NullAuth.authorization_header(&parts), None);
        assert_eq!(NullAuth.session_cookie(&parts), None);
    }

    #[test]
    fn test_require_auth_delegates_to_rules() {
        let rules = ExcludedPath::parse_all(["/api/v1/status/"]);
        assert!(!NullAuth.require_auth(Some("/api/v1/status"), &rules));
        assert!(NullAuth.require_auth(Some("/api/v1/users"), &rules));
        assert!(NullAuth.require_auth(None, &rules));
    }

    #[test]
    fn test_from_config() {
        let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
        let sessions = Arc::new(SessionLifecycleManager::plain());

        assert!(
            Strategy::from_config(&AuthConfig::default(), users.clone(), sessions.clone())
                .is_none()
        );

        for (raw, expected) in [
            ("auth", "auth"),
            ("basic_auth", "basic_auth"),
            ("session_auth", "session_auth"),
            ("session_exp_auth", "session_auth"),
            ("session_db_auth", "session_auth"),
        ] {
            let strategy =
                Strategy::from_config(&config_for(raw), users.clone(), sessions.clone())
                    .expect("strategy");
            assert_eq!(strategy.name(), expected);
        }
    }
}
