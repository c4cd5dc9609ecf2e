use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A login, keyed by an opaque identifier. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct SessionRecord {
    pub session_id: String,
    pub user_id: String,
    /// Always set on records this crate creates. A record without it is
    /// only honoured while expiry is disabled.
    pub created_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    pub fn new(session_id: String, user_id: String) -> Self {
        Self {
            session_id,
            user_id,
            created_at: Some(Utc::now()),
        }
    }

    /// Whether the record is still usable at `now` for a given duration in
    /// seconds. A duration `<= 0` never expires, even without `created_at`.
    /// A deadline beyond the representable range never expires either.
    pub fn is_valid_at(&self, session_duration: i64, now: DateTime<Utc>) -> bool {
        if session_duration <= 0 {
            return true;
        }
        let Some(created_at) = self.created_at else {
            return false;
        };
        match Duration::try_seconds(session_duration)
            .and_then(|d| created_at.checked_add_signed(d))
        {
            Some(deadline) => deadline >= now,
            None => true,
        }
    }
}
