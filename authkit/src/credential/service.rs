use std::sync::Arc;
use tokio::sync::Mutex;

use crate::password::{hash_password_blocking, verify_password_blocking};
use crate::userdb::{User, UserError, UserSearchField, UserStore, UserUpdate};
use crate::utils::gen_random_string;

use super::errors::CredentialError;

const SESSION_ID_LEN: usize = 32;
const RESET_TOKEN_LEN: usize = 32;

/// Registration, login and password reset against a [`UserStore`]
///
/// Sessions here live on the user record itself: each login overwrites the
/// user's single `session_id`. Read-modify-write sequences are serialized on
/// `write_lock` so concurrent requests on one user cannot lose updates.
/// Passwords are hashed on the blocking pool before the lock is taken.
pub struct CredentialService {
    users: Arc<dyn UserStore>,
    write_lock: Mutex<()>,
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            write_lock: Mutex::new(()),
        }
    }

    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    async fn find_by(&self, field: UserSearchField) -> Result<Option<User>, CredentialError> {
        Ok(self.users.find_one(&field).await?)
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn register_user(&self, email: &str, password: &str) -> Result<User, CredentialError> {
        let hashed_password = hash_password_blocking(password).await?;
        let _guard = self.write_lock.lock().await;

        if self
            .find_by(UserSearchField::Email(email.to_string()))
            .await?
            .is_some()
        {
            return Err(CredentialError::AlreadyExists(email.to_string()).log());
        }

        let user = self.users.insert(email, &hashed_password).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// `false` for an unknown email, a wrong password or a failed lookup
    #[tracing::instrument(skip(self, password))]
    pub async fn valid_login(&self, email: &str, password: &str) -> bool {
        match self.find_by(UserSearchField::Email(email.to_string())).await {
            Ok(Some(user)) => verify_password_blocking(password, &user.hashed_password).await,
            Ok(None) => {
                tracing::debug!("Login for unknown email");
                false
            }
            Err(_) => false,
        }
    }

    /// Check the credentials and open a session in one step
    #[tracing::instrument(skip(self, password))]
    pub async fn log_in(&self, email: &str, password: &str) -> Result<String, CredentialError> {
        if !self.valid_login(email, password).await {
            return Err(CredentialError::InvalidCredentials.log());
        }
        self.try_create_session(email)
            .await?
            .ok_or_else(|| CredentialError::InvalidCredentials.log())
    }

    /// Store a fresh session id on the user, replacing any previous one
    #[tracing::instrument(skip(self))]
    pub async fn create_session(&self, email: &str) -> Option<String> {
        match self.try_create_session(email).await {
            Ok(session_id) => session_id,
            Err(e) => {
                e.log();
                None
            }
        }
    }

    async fn try_create_session(&self, email: &str) -> Result<Option<String>, CredentialError> {
        let _guard = self.write_lock.lock().await;

        let Some(user) = self.find_by(UserSearchField::Email(email.to_string())).await? else {
            tracing::debug!("No user to open a session for");
            return Ok(None);
        };

        let session_id = gen_random_string(SESSION_ID_LEN)?;
        self.users
            .update(&user.id, UserUpdate::session_id(Some(session_id.clone())))
            .await?;

        tracing::info!(user_id = %user.id, "Session created");
        Ok(Some(session_id))
    }

    pub async fn get_user_from_session_id(&self, session_id: Option<&str>) -> Option<User> {
        let session_id = session_id?;
        match self
            .find_by(UserSearchField::SessionId(session_id.to_string()))
            .await
        {
            Ok(user) => user,
            Err(_) => None,
        }
    }

    /// Clear the user's session. Clearing twice, or for an unknown user, is
    /// not an error.
    #[tracing::instrument(skip(self))]
    pub async fn destroy_session(&self, user_id: &str) -> Result<(), CredentialError> {
        let _guard = self.write_lock.lock().await;

        match self.users.update(user_id, UserUpdate::session_id(None)).await {
            Ok(_) => {
                tracing::info!("Session destroyed");
                Ok(())
            }
            Err(UserError::NotFound) => {
                tracing::debug!("No user to destroy a session for");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Issue a reset token for `email`, replacing any outstanding one
    #[tracing::instrument(skip(self))]
    pub async fn get_reset_password_token(&self, email: &str) -> Result<String, CredentialError> {
        let _guard = self.write_lock.lock().await;

        let user = self
            .find_by(UserSearchField::Email(email.to_string()))
            .await?
            .ok_or_else(|| CredentialError::NotFound.log())?;

        let token = gen_random_string(RESET_TOKEN_LEN)?;
        self.users
            .update(&user.id, UserUpdate::reset_token(Some(token.clone())))
            .await?;

        tracing::info!(user_id = %user.id, "Reset token issued");
        Ok(token)
    }

    /// Consume a reset token. The token is cleared along with the new hash
    /// in a single update, so it works only once.
    #[tracing::instrument(skip(self, reset_token, password))]
    pub async fn update_password(
        &self,
        reset_token: &str,
        password: &str,
    ) -> Result<(), CredentialError> {
        let hashed_password = hash_password_blocking(password).await?;
        let _guard = self.write_lock.lock().await;

        let user = self
            .find_by(UserSearchField::ResetToken(reset_token.to_string()))
            .await?
            .ok_or_else(|| CredentialError::InvalidToken.log())?;

        self.users
            .update(
                &user.id,
                UserUpdate {
                    hashed_password: Some(hashed_password),
                    reset_token: Some(None),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(user_id = %user.id, "Password updated");
        Ok(())
    }
}
