mod errors;
mod schema_validation;
mod sqlite;

pub use errors::StorageError;
pub(crate) use schema_validation::validate_sqlite_table_schema;
pub use sqlite::connect_sqlite;
