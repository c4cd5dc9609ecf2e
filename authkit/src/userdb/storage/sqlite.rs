use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

use crate::storage::validate_sqlite_table_schema;
use crate::userdb::{
    errors::UserError,
    types::{User, UserSearchField, UserUpdate},
};

use super::store_type::UserStore;

/// User table in a SQLite database
pub struct SqliteUserStore {
    pool: Pool<Sqlite>,
    table_name: String,
}

impl SqliteUserStore {
    /// Create the table if needed and validate its schema
    pub async fn new(pool: Pool<Sqlite>, table_name: impl Into<String>) -> Result<Self, UserError> {
        let store = Self {
            pool,
            table_name: table_name.into(),
        };
        store.create_tables().await?;
        store.validate_tables().await?;
        tracing::info!("SQLite user store ready: table={}", store.table_name);
        Ok(store)
    }

    async fn create_tables(&self) -> Result<(), UserError> {
        let table_name = &self.table_name;

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table_name} (
                id TEXT PRIMARY KEY NOT NULL,
                email TEXT NOT NULL UNIQUE,
                hashed_password TEXT NOT NULL,
                session_id TEXT,
                reset_token TEXT,
                created_at TIMESTAMP NOT NULL,
                updated_at TIMESTAMP NOT NULL
            )
            "#
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn validate_tables(&self) -> Result<(), UserError> {
        let expected_columns = [
            ("id", "TEXT"),
            ("email", "TEXT"),
            ("hashed_password", "TEXT"),
            ("session_id", "TEXT"),
            ("reset_token", "TEXT"),
            ("created_at", "TIMESTAMP"),
            ("updated_at", "TIMESTAMP"),
        ];

        validate_sqlite_table_schema(
            &self.pool,
            &self.table_name,
            &expected_columns,
            UserError::Storage,
        )
        .await
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    #[tracing::instrument(skip(self, field), fields(user_field = %field))]
    async fn find(&self, field: &UserSearchField) -> Result<Vec<User>, UserError> {
        let table_name = &self.table_name;
        let column = field.column();

        let result = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT * FROM {table_name} WHERE {column} = ?
            "#
        ))
        .bind(field.value())
        .fetch_all(&self.pool)
        .await
        .map_err(UserError::from);

        match &result {
            Ok(users) => tracing::debug!(found = users.len(), "User lookup completed"),
            Err(e) => tracing::error!(error = %e, "User lookup failed"),
        }

        result
    }

    #[tracing::instrument(skip(self, hashed_password))]
    async fn insert(&self, email: &str, hashed_password: &str) -> Result<User, UserError> {
        let table_name = &self.table_name;
        let user = User::new(email.to_string(), hashed_password.to_string());

        sqlx::query(&format!(
            r#"
            INSERT INTO {table_name} (id, email, hashed_password, session_id, reset_token, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#
        ))
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(&user.session_id)
        .bind(&user.reset_token)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => UserError::AlreadyExists(email.to_string()),
            _ => UserError::from(e),
        })?;

        tracing::info!(user_id = %user.id, "User inserted");
        Ok(user)
    }

    #[tracing::instrument(skip(self, update))]
    async fn update(&self, id: &str, update: UserUpdate) -> Result<User, UserError> {
        let table_name = &self.table_name;
        let mut tx = self.pool.begin().await?;

        let mut user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT * FROM {table_name} WHERE id = ?
            "#
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(UserError::NotFound)?;

        let new_email = update.email.clone();
        user.apply(update);

        sqlx::query(&format!(
            r#"
            UPDATE {table_name}
            SET email = ?, hashed_password = ?, session_id = ?, reset_token = ?, updated_at = ?
            WHERE id = ?
            "#
        ))
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(&user.session_id)
        .bind(&user.reset_token)
        .bind(user.updated_at)
        .bind(&user.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| match (e.as_database_error(), new_email) {
            (Some(db), Some(email)) if db.is_unique_violation() => UserError::AlreadyExists(email),
            _ => UserError::from(e),
        })?;

        tx.commit().await?;
        Ok(user)
    }

    async fn count(&self) -> Result<usize, UserError> {
        let table_name = &self.table_name;
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table_name}"))
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }
}
