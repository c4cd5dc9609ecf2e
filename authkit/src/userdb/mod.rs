mod errors;
mod storage;
mod types;

pub use errors::UserError;
pub use storage::{InMemoryUserStore, SqliteUserStore, UserStore};
pub use types::{User, UserSearchField, UserUpdate};
