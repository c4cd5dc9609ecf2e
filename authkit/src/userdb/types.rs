use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// A registered principal
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    /// Unique user identifier
    pub id: String,
    /// Login identifier, unique across all users
    pub email: String,
    /// Argon2 PHC string, never serialized
    #[serde(skip_serializing, default)]
    pub hashed_password: String,
    /// Session held under the single-session-per-user scheme
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Outstanding password reset token
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, hashed_password: String) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            hashed_password,
            session_id: None,
            reset_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this user satisfies a search predicate
    pub fn matches(&self, field: &UserSearchField) -> bool {
        match field {
            UserSearchField::Id(id) => &self.id == id,
            UserSearchField::Email(email) => &self.email == email,
            UserSearchField::SessionId(sid) => self.session_id.as_ref() == Some(sid),
            UserSearchField::ResetToken(token) => self.reset_token.as_ref() == Some(token),
        }
    }

    /// Apply a partial update in place, bumping `updated_at`
    pub fn apply(&mut self, update: UserUpdate) {
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(hashed_password) = update.hashed_password {
            self.hashed_password = hashed_password;
        }
        if let Some(session_id) = update.session_id {
            self.session_id = session_id;
        }
        if let Some(reset_token) = update.reset_token {
            self.reset_token = reset_token;
        }
        self.updated_at = Utc::now();
    }
}

/// Single-field predicate for user lookups
#[derive(Debug, Clone, PartialEq)]
pub enum UserSearchField {
    Id(String),
    Email(String),
    SessionId(String),
    ResetToken(String),
}

impl UserSearchField {
    pub(crate) fn column(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::Email(_) => "email",
            Self::SessionId(_) => "session_id",
            Self::ResetToken(_) => "reset_token",
        }
    }

    pub(crate) fn value(&self) -> &str {
        match self {
            Self::Id(v) | Self::Email(v) | Self::SessionId(v) | Self::ResetToken(v) => v,
        }
    }
}

// Tokens stay out of logs
impl fmt::Display for UserSearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id={id}"),
            Self::Email(email) => write!(f, "email={email}"),
            Self::SessionId(_) => f.write_str("session_id=<redacted>"),
            Self::ResetToken(_) => f.write_str("reset_token=<redacted>"),
        }
    }
}

/// Partial update. Nullable columns take `Some(None)` to clear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub hashed_password: Option<String>,
    pub session_id: Option<Option<String>>,
    pub reset_token: Option<Option<String>>,
}

impl UserUpdate {
    pub fn session_id(session_id: Option<String>) -> Self {
        Self {
            session_id: Some(session_id),
            ..Default::default()
        }
    }

    pub fn reset_token(reset_token: Option<String>) -> Self {
        Self {
            reset_token: Some(reset_token),
            ..Default::default()
        }
    }
}
