use async_trait::async_trait;
use redis::{self, AsyncCommands};

use crate::session::{errors::SessionError, types::SessionRecord};
use crate::storage::StorageError;

use super::store_type::SessionStore;

const SESSION_PREFIX: &str = "session";

/// Records stored as JSON under `session:<id>`
///
/// No Redis TTL is set: expiry is decided on read, and a stale record stays
/// until it is destroyed.
pub struct RedisSessionStore {
    client: redis::Client,
}

impl RedisSessionStore {
    /// Open a client and verify the server answers
    pub async fn connect(url: &str) -> Result<Self, SessionError> {
        let client = redis::Client::open(url).map_err(StorageError::from)?;
        let store = Self { client };
        store.reload().await?;
        tracing::info!("Connected to Redis session store: {}", url);
        Ok(store)
    }

    fn make_key(key: &str) -> String {
        format!("{SESSION_PREFIX}:{key}")
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StorageError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn reload(&self) -> Result<(), SessionError> {
        // Verify the connection works
        let _conn = self.connection().await?;
        Ok(())
    }

    async fn put(&self, record: SessionRecord) -> Result<(), SessionError> {
        let mut conn = self.connection().await?;

        let key = Self::make_key(&record.session_id);
        let value = serde_json::to_string(&record).map_err(StorageError::from)?;
        let _: () = conn.set(&key, value).await.map_err(StorageError::from)?;
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionError> {
        let mut conn = self.connection().await?;

        let key = Self::make_key(session_id);
        let value: Option<String> = conn.get(&key).await.map_err(StorageError::from)?;

        match value {
            Some(v) => Ok(Some(serde_json::from_str(&v).map_err(StorageError::from)?)),
            None => Ok(None),
        }
    }

    async fn remove(&self, session_id: &str) -> Result<bool, SessionError> {
        let mut conn = self.connection().await?;

        let key = Self::make_key(session_id);
        let removed: i64 = conn.del(&key).await.map_err(StorageError::from)?;
        Ok(removed > 0)
    }

    fn is_durable(&self) -> bool {
        true
    }
}
