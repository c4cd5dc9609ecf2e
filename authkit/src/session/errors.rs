use thiserror::Error;

use crate::storage::StorageError;
use crate::utils::UtilError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(String),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}

impl From<StorageError> for SessionError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<sqlx::Error> for SessionError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let err: SessionError = UtilError::Crypto("rng".to_string()).into();
        assert_eq!(err.to_string(), "Utils error: Crypto error: rng");

        let err: SessionError = StorageError::Storage("down".to_string()).into();
        assert_eq!(err, SessionError::Storage("Storage error: down".to_string()));

        let err: SessionError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, SessionError::Storage(_)));
    }
}
