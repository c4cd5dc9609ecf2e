mod memory;
mod redis;
mod sqlite;
mod store_type;

pub use memory::InMemorySessionStore;
pub use redis::RedisSessionStore;
pub use sqlite::SqliteSessionStore;
pub use store_type::SessionStore;
