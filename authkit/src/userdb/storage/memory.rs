use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::userdb::{
    errors::UserError,
    types::{User, UserSearchField, UserUpdate},
};

use super::store_type::UserStore;

/// Process-local user table
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory user store");
        Self {
            users: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    #[tracing::instrument(skip(self, field), fields(user_field = %field))]
    async fn find(&self, field: &UserSearchField) -> Result<Vec<User>, UserError> {
        let users = self.users.lock().await;
        let found: Vec<User> = users.iter().filter(|u| u.matches(field)).cloned().collect();
        tracing::debug!(found = found.len(), "User lookup completed");
        Ok(found)
    }

    #[tracing::instrument(skip(self, hashed_password))]
    async fn insert(&self, email: &str, hashed_password: &str) -> Result<User, UserError> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == email) {
            return Err(UserError::AlreadyExists(email.to_string()));
        }
        let user = User::new(email.to_string(), hashed_password.to_string());
        users.push(user.clone());
        tracing::info!(user_id = %user.id, "User inserted");
        Ok(user)
    }

    #[tracing::instrument(skip(self, update))]
    async fn update(&self, id: &str, update: UserUpdate) -> Result<User, UserError> {
        let mut users = self.users.lock().await;

        if let Some(email) = &update.email {
            if users.iter().any(|u| &u.email == email && u.id != id) {
                return Err(UserError::AlreadyExists(email.clone()));
            }
        }

        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(UserError::NotFound)?;
        user.apply(update);
        Ok(user.clone())
    }

    async fn count(&self) -> Result<usize, UserError> {
        Ok(self.users.lock().await.len())
    }
}
