use std::sync::Arc;

use crate::auth::{AuthStrategy, Strategy};
use crate::config::{AuthConfig, StoreType};
use crate::credential::CredentialService;
use crate::session::SessionLifecycleManager;
use crate::storage::connect_sqlite;
use crate::userdb::{InMemoryUserStore, SqliteUserStore, UserStore};

/// Everything a request handler needs, built once at startup
#[derive(Clone)]
pub struct AuthContext {
    pub config: AuthConfig,
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<SessionLifecycleManager>,
    /// `None` when `AUTH_TYPE` is unset
    pub strategy: Option<Arc<dyn AuthStrategy>>,
    pub credentials: Arc<CredentialService>,
}

impl AuthContext {
    /// Wire components from already-built stores
    pub fn new(
        config: AuthConfig,
        users: Arc<dyn UserStore>,
        sessions: SessionLifecycleManager,
    ) -> Self {
        let sessions = Arc::new(sessions);
        let strategy = Strategy::from_config(&config, users.clone(), sessions.clone());
        let credentials = Arc::new(CredentialService::new(users.clone()));
        Self {
            config,
            users,
            sessions,
            strategy,
            credentials,
        }
    }
}

/// Connect the configured stores and build the context
pub async fn init(
    config: AuthConfig,
) -> Result<AuthContext, Box<dyn std::error::Error + Send + Sync>> {
    let users: Arc<dyn UserStore> = match config.user_store_type {
        StoreType::Sqlite => {
            let pool = connect_sqlite(&config.user_store_url).await?;
            Arc::new(SqliteUserStore::new(pool, config.users_table()).await?)
        }
        _ => Arc::new(InMemoryUserStore::new()),
    };
    let sessions = SessionLifecycleManager::from_config(&config).await?;

    tracing::info!(
        auth_type = ?config.auth_type,
        user_store = ?config.user_store_type,
        "Authentication initialized"
    );
    Ok(AuthContext::new(config, users, sessions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionKind;

    #[tokio::test]
    async fn test_init_defaults() {
        let context = init(AuthConfig::default()).await.expect("init");

        assert!(context.strategy.is_none());
        assert_eq!(context.sessions.kind(), SessionKind::Plain);
        assert_eq!(context.users.count().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_init_sqlite_users_with_durable_sessions() {
        let config = AuthConfig::from_lookup(|key| match key {
            "AUTH_TYPE" => Some("session_db_auth".to_string()),
            "USER_STORE_TYPE" => Some("sqlite".to_string()),
            "SESSION_DURATION" => Some("60".to_string()),
            _ => None,
        });

        let context = init(config).await.expect("init");

        assert_eq!(context.sessions.kind(), SessionKind::Durable);
        assert_eq!(
            context.strategy.as_ref().map(|s| s.name()),
            Some("session_auth")
        );

        // Credentials and the strategy share one user store
        let user = context
            .credentials
            .register_user("a@b.c", "pw")
            .await
            .expect("register");
        assert_eq!(context.users.count().await.expect("count"), 1);
        let sid = context
            .sessions
            .create_session(Some(user.id.as_str()))
            .await
            .expect("session");
        assert!(
            context
                .sessions
                .user_id_for_session_id(Some(sid.as_str()))
                .await
                .is_some()
        );
    }
}
