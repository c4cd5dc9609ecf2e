use async_trait::async_trait;

use crate::userdb::{
    errors::UserError,
    types::{User, UserSearchField, UserUpdate},
};

/// Principal store collaborator
///
/// A clean miss is an empty result, never an error.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// All users matching the predicate
    async fn find(&self, field: &UserSearchField) -> Result<Vec<User>, UserError>;

    /// Persist a new user. Fails with `AlreadyExists` on a duplicate email.
    async fn insert(&self, email: &str, hashed_password: &str) -> Result<User, UserError>;

    /// Apply a partial update. Fails with `NotFound` for an unknown id.
    async fn update(&self, id: &str, update: UserUpdate) -> Result<User, UserError>;

    async fn count(&self) -> Result<usize, UserError>;

    /// First user matching the predicate
    async fn find_one(&self, field: &UserSearchField) -> Result<Option<User>, UserError> {
        Ok(self.find(field).await?.into_iter().next())
    }
}
