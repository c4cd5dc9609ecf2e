mod errors;
mod manager;
mod storage;
mod types;

pub use errors::SessionError;
pub use manager::{SessionKind, SessionLifecycleManager};
pub use storage::{InMemorySessionStore, RedisSessionStore, SessionStore, SqliteSessionStore};
pub use types::SessionRecord;
