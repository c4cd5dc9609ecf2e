use chrono::{DateTime, Utc};
use http::HeaderMap;
use std::sync::Arc;

use crate::config::{AuthConfig, AuthType, DEFAULT_SESSION_NAME, StoreType};
use crate::session::errors::SessionError;
use crate::session::storage::{
    InMemorySessionStore, RedisSessionStore, SessionStore, SqliteSessionStore,
};
use crate::storage::connect_sqlite;
use crate::session::types::SessionRecord;
use crate::utils::{gen_random_string, get_cookie};

/// Random bytes per session id (256 bits)
const SESSION_ID_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// In memory, never expires
    Plain,
    /// In memory, lazily expired after `session_duration` seconds
    Expiring,
    /// Persisted to a backing store, lazily expired
    Durable,
}

/// Creates, resolves and destroys sessions
///
/// One instance per process, shared by reference between request handlers.
/// Plain and expiring managers keep records in memory. A durable manager
/// keeps them only in its backing store, reloading it before each lookup.
pub struct SessionLifecycleManager {
    kind: SessionKind,
    store: Arc<dyn SessionStore>,
    session_duration: i64,
    cookie_name: String,
}

impl SessionLifecycleManager {
    pub fn plain() -> Self {
        Self::new(SessionKind::Plain, None, 0, DEFAULT_SESSION_NAME)
    }

    /// `session_duration <= 0` disables expiry
    pub fn expiring(session_duration: i64) -> Self {
        Self::new(
            SessionKind::Expiring,
            None,
            session_duration,
            DEFAULT_SESSION_NAME,
        )
    }

    pub fn durable(store: Arc<dyn SessionStore>, session_duration: i64) -> Self {
        Self::new(
            SessionKind::Durable,
            Some(store),
            session_duration,
            DEFAULT_SESSION_NAME,
        )
    }

    /// `store` is only used by [`SessionKind::Durable`]. A durable kind
    /// without a store falls back to memory.
    pub fn new(
        kind: SessionKind,
        store: Option<Arc<dyn SessionStore>>,
        session_duration: i64,
        cookie_name: impl Into<String>,
    ) -> Self {
        let store: Arc<dyn SessionStore> = match (kind, store) {
            (SessionKind::Durable, Some(store)) => {
                if !store.is_durable() {
                    tracing::warn!("Durable sessions backed by a volatile store; lost on restart");
                }
                store
            }
            (SessionKind::Durable, None) => {
                tracing::warn!("Durable sessions requested without a store; keeping them in memory");
                Arc::new(InMemorySessionStore::new())
            }
            _ => Arc::new(InMemorySessionStore::new()),
        };
        tracing::info!(
            ?kind,
            session_duration,
            durable = store.is_durable(),
            "Initializing session lifecycle manager"
        );
        Self {
            kind,
            store,
            session_duration,
            cookie_name: cookie_name.into(),
        }
    }

    /// Manager matching the configured strategy. Only `session_db_auth`
    /// connects to the session store.
    pub async fn from_config(config: &AuthConfig) -> Result<Self, SessionError> {
        let manager = match config.auth_type {
            Some(AuthType::SessionExpAuth) => Self::expiring(config.session_duration),
            Some(AuthType::SessionDbAuth) => {
                let store = connect_session_store(config).await?;
                Self::durable(store, config.session_duration)
            }
            _ => Self::plain(),
        };
        Ok(manager.with_cookie_name(config.session_name.clone()))
    }

    pub fn with_cookie_name(mut self, cookie_name: impl Into<String>) -> Self {
        self.cookie_name = cookie_name.into();
        self
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn session_duration(&self) -> i64 {
        self.session_duration
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Start a session for `user_id`. `None` when there is no user or the
    /// session could not be stored.
    pub async fn create_session(&self, user_id: Option<&str>) -> Option<String> {
        let user_id = user_id?;
        match self.try_create_session(user_id).await {
            Ok(session_id) => Some(session_id),
            Err(e) => {
                tracing::error!("Failed to create session: {}", e);
                None
            }
        }
    }

    async fn try_create_session(&self, user_id: &str) -> Result<String, SessionError> {
        let session_id = gen_random_string(SESSION_ID_LEN)?;
        let record = SessionRecord::new(session_id.clone(), user_id.to_string());

        self.store.put(record).await?;

        tracing::info!(user_id = %user_id, kind = ?self.kind, "Session created");
        Ok(session_id)
    }

    /// Raw record lookup, without any expiry check
    pub async fn lookup(&self, session_id: &str) -> Option<SessionRecord> {
        let result = match self.store.reload().await {
            Ok(()) => self.store.get(session_id).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Session lookup failed: {}", e);
                None
            }
        }
    }

    /// Owner of a live session. Expired records are reported as `None` but
    /// left in place.
    pub async fn user_id_for_session_id(&self, session_id: Option<&str>) -> Option<String> {
        self.user_id_for_session_id_at(session_id, Utc::now()).await
    }

    pub(crate) async fn user_id_for_session_id_at(
        &self,
        session_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Option<String> {
        let session_id = session_id?;
        let Some(record) = self.lookup(session_id).await else {
            tracing::debug!("Unknown session id");
            return None;
        };

        if self.kind == SessionKind::Plain || record.is_valid_at(self.session_duration, now) {
            return Some(record.user_id);
        }

        tracing::debug!(
            user_id = %record.user_id,
            created_at = ?record.created_at,
            "Session expired"
        );
        None
    }

    /// Session id carried by the request's cookie
    pub fn session_cookie<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        get_cookie(headers, &self.cookie_name)
    }

    /// Log out the session named by the request cookie. `true` only when a
    /// live session was found and removed.
    pub async fn destroy_session(&self, headers: &HeaderMap) -> bool {
        self.destroy_session_at(headers, Utc::now()).await
    }

    pub(crate) async fn destroy_session_at(&self, headers: &HeaderMap, now: DateTime<Utc>) -> bool {
        let Some(session_id) = self.session_cookie(headers) else {
            tracing::debug!("No session cookie '{}' found", self.cookie_name);
            return false;
        };
        if self
            .user_id_for_session_id_at(Some(session_id), now)
            .await
            .is_none()
        {
            return false;
        }

        match self.store.remove(session_id).await {
            Ok(true) => {
                tracing::info!("Session destroyed");
                true
            }
            Ok(false) => false,
            Err(e) => {
                tracing::error!("Failed to destroy session: {}", e);
                false
            }
        }
    }
}

async fn connect_session_store(config: &AuthConfig) -> Result<Arc<dyn SessionStore>, SessionError> {
    let store: Arc<dyn SessionStore> = match config.session_store_type {
        StoreType::Memory => Arc::new(InMemorySessionStore::new()),
        StoreType::Sqlite => {
            let pool = connect_sqlite(&config.session_store_url).await?;
            Arc::new(SqliteSessionStore::new(pool, config.sessions_table()).await?)
        }
        StoreType::Redis => Arc::new(RedisSessionStore::connect(&config.session_store_url).await?),
    };
    Ok(store)
}
