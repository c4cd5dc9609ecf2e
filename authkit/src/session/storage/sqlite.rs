use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

use crate::session::{errors::SessionError, types::SessionRecord};
use crate::storage::validate_sqlite_table_schema;

use super::store_type::SessionStore;

/// One row per session, so a user may hold many concurrent sessions
pub struct SqliteSessionStore {
    pool: Pool<Sqlite>,
    table_name: String,
}

impl SqliteSessionStore {
    pub async fn new(
        pool: Pool<Sqlite>,
        table_name: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let store = Self {
            pool,
            table_name: table_name.into(),
        };
        store.create_tables().await?;
        validate_sqlite_table_schema(
            &store.pool,
            &store.table_name,
            &[
                ("session_id", "TEXT"),
                ("user_id", "TEXT"),
                ("created_at", "TIMESTAMP"),
            ],
            SessionError::Storage,
        )
        .await?;
        tracing::info!("SQLite session store ready: table={}", store.table_name);
        Ok(store)
    }

    async fn create_tables(&self) -> Result<(), SessionError> {
        let table_name = &self.table_name;

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table_name} (
                session_id TEXT PRIMARY KEY NOT NULL,
                user_id TEXT NOT NULL,
                created_at TIMESTAMP
            )
            "#
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    /// Rows are always read straight from the database; this only makes sure
    /// the table is still there (an in-memory database may have been reset).
    async fn reload(&self) -> Result<(), SessionError> {
        self.create_tables().await
    }

    async fn put(&self, record: SessionRecord) -> Result<(), SessionError> {
        let table_name = &self.table_name;

        sqlx::query(&format!(
            r#"
            INSERT INTO {table_name} (session_id, user_id, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT (session_id) DO UPDATE SET
                user_id = excluded.user_id,
                created_at = excluded.created_at
            "#
        ))
        .bind(&record.session_id)
        .bind(&record.user_id)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionError> {
        let table_name = &self.table_name;

        let record = sqlx::query_as::<_, SessionRecord>(&format!(
            r#"
            SELECT session_id, user_id, created_at FROM {table_name} WHERE session_id = ?
            "#
        ))
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn remove(&self, session_id: &str) -> Result<bool, SessionError> {
        let table_name = &self.table_name;

        let result = sqlx::query(&format!(
            r#"
            DELETE FROM {table_name} WHERE session_id = ?
            "#
        ))
        .bind(session_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    fn is_durable(&self) -> bool {
        true
    }
}
