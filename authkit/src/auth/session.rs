use async_trait::async_trait;
use http::request::Parts;
use std::sync::Arc;

use crate::session::SessionLifecycleManager;
use crate::userdb::{User, UserSearchField, UserStore};

use super::strategy::AuthStrategy;

/// Session cookie resolved through a [`SessionLifecycleManager`]
///
/// Plain, expiring and durable sessions differ only in the manager handed in.
pub struct SessionAuth {
    users: Arc<dyn UserStore>,
    sessions: Arc<SessionLifecycleManager>,
}

impl SessionAuth {
    pub fn new(users: Arc<dyn UserStore>, sessions: Arc<SessionLifecycleManager>) -> Self {
        Self { users, sessions }
    }
}

#[async_trait]
impl AuthStrategy for SessionAuth {
    fn name(&self) -> &'static str {
        "session_auth"
    }

    fn cookie_name(&self) -> &str {
        self.sessions.cookie_name()
    }

    async fn current_user(&self, parts: &Parts) -> Option<User> {
        let session_id = self.session_cookie(parts);
        let user_id = self.sessions.user_id_for_session_id(session_id).await?;

        match self.users.find_one(&UserSearchField::Id(user_id)).await {
            Ok(user) => {
                if user.is_none() {
                    tracing::debug!("Session points at a user that no longer exists");
                }
                user
            }
            Err(e) => {
                tracing::error!("User lookup failed: {}", e);
                None
            }
        }
    }
}
