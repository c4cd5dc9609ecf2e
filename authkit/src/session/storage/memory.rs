use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::session::{errors::SessionError, types::SessionRecord};

use super::store_type::SessionStore;

/// Session id to record map, lost on restart
pub struct InMemorySessionStore {
    entry: Mutex<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory session store");
        Self {
            entry: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put(&self, record: SessionRecord) -> Result<(), SessionError> {
        self.entry
            .lock()
            .await
            .insert(record.session_id.clone(), record);
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionError> {
        Ok(self.entry.lock().await.get(session_id).cloned())
    }

    async fn remove(&self, session_id: &str) -> Result<bool, SessionError> {
        Ok(self.entry.lock().await.remove(session_id).is_some())
    }

    fn is_durable(&self) -> bool {
        false
    }
}
