use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use super::errors::StorageError;

/// Open a pool for `url`, creating the database file when missing.
///
/// In-memory databases are pinned to a single connection that never idles
/// out, otherwise every pooled connection would see its own empty database.
pub async fn connect_sqlite(url: &str) -> Result<SqlitePool, StorageError> {
    let opts = SqliteConnectOptions::from_str(url)
        .map_err(|e| StorageError::Storage(format!("Invalid SQLite URL {url}: {e}")))?
        .create_if_missing(true);

    let pool_options = if url.contains(":memory:") || url.contains("mode=memory") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
    };

    tracing::info!("Connecting to SQLite database: {}", url);
    Ok(pool_options.connect_with(opts).await?)
}
