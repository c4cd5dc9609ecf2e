mod memory;
mod sqlite;
mod store_type;

pub use memory::InMemoryUserStore;
pub use sqlite::SqliteUserStore;
pub use store_type::UserStore;
