use async_trait::async_trait;

use crate::session::{errors::SessionError, types::SessionRecord};

/// Backing storage for session records
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Refresh any local view of the backing store. Called before every
    /// durable lookup.
    async fn reload(&self) -> Result<(), SessionError> {
        Ok(())
    }

    /// Store a record, replacing any record with the same id
    async fn put(&self, record: SessionRecord) -> Result<(), SessionError>;

    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionError>;

    /// Returns whether a record was removed
    async fn remove(&self, session_id: &str) -> Result<bool, SessionError>;

    /// Whether records survive a process restart
    fn is_durable(&self) -> bool;
}
