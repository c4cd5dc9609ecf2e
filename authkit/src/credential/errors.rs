use thiserror::Error;

use crate::password::PasswordError;
use crate::userdb::UserError;
use crate::utils::UtilError;

/// Failures surfaced by [`super::CredentialService`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CredentialError {
    /// Registration with an email that is already taken
    #[error("User {0} already exists")]
    AlreadyExists(String),

    /// No user matches the given email
    #[error("User not found")]
    NotFound,

    /// Unknown email or wrong password at login
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No user holds the given reset token
    #[error("Invalid reset token")]
    InvalidToken,

    #[error("User error: {0}")]
    User(UserError),

    #[error("Password error: {0}")]
    Password(PasswordError),

    #[error("Utils error: {0}")]
    Utils(UtilError),
}

impl CredentialError {
    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::AlreadyExists(email) => tracing::debug!("User {} already exists", email),
            Self::NotFound => tracing::debug!("User not found"),
            Self::InvalidCredentials => tracing::debug!("Invalid credentials"),
            Self::InvalidToken => tracing::debug!("Invalid reset token"),
            Self::User(err) => tracing::error!("User error: {}", err),
            Self::Password(err) => tracing::error!("Password error: {}", err),
            Self::Utils(err) => tracing::error!("Utils error: {}", err),
        }
        self
    }
}

// Lower-layer failures are logged once on conversion

impl From<UserError> for CredentialError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::AlreadyExists(email) => Self::AlreadyExists(email),
            err => {
                let error = Self::User(err);
                tracing::error!("{}", error);
                error
            }
        }
    }
}

impl From<PasswordError> for CredentialError {
    fn from(err: PasswordError) -> Self {
        let error = Self::Password(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<UtilError> for CredentialError {
    fn from(err: UtilError) -> Self {
        let error = Self::Utils(err);
        tracing::error!("{}", error);
        error
    }
}
