use async_trait::async_trait;
use http::request::Parts;
use std::sync::Arc;

use crate::password::verify_password_blocking;
use crate::userdb::{User, UserSearchField, UserStore};
use crate::utils::base64_decode;

use super::strategy::AuthStrategy;

const BASIC_PREFIX: &str = "Basic ";

/// Payload of an `Authorization: Basic <payload>` header. The prefix is
/// matched exactly, case included.
pub fn extract_base64_authorization_header(header: Option<&str>) -> Option<&str> {
    let payload = header?.strip_prefix(BASIC_PREFIX);
    if payload.is_none() {
        tracing::debug!("Authorization header is not a Basic credential");
    }
    payload
}

/// Base64 then UTF-8 decode. Malformed input of either kind is `None`.
pub fn decode_base64_authorization_header(payload: Option<&str>) -> Option<String> {
    let bytes = match base64_decode(payload?) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("Basic payload rejected: {}", e);
            return None;
        }
    };
    match String::from_utf8(bytes) {
        Ok(decoded) => Some(decoded),
        Err(_) => {
            tracing::debug!("Basic payload is not valid UTF-8");
            None
        }
    }
}

/// Split `email:password` on the first colon; passwords may contain colons
pub fn extract_user_credentials(decoded: Option<&str>) -> Option<(&str, &str)> {
    let credentials = decoded?.split_once(':');
    if credentials.is_none() {
        tracing::debug!("Basic credentials have no ':' separator");
    }
    credentials
}

/// `Authorization: Basic` credentials checked against the user store
pub struct BasicAuth {
    users: Arc<dyn UserStore>,
}

impl BasicAuth {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// The user with this email, if the password verifies
    pub async fn user_object_from_credentials(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Option<User> {
        let (email, password) = (email?, password?);

        let user = match self
            .users
            .find_one(&UserSearchField::Email(email.to_string()))
            .await
        {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::debug!(email = %email, "No user for Basic credentials");
                return None;
            }
            Err(e) => {
                tracing::error!("User lookup failed: {}", e);
                return None;
            }
        };

        if !verify_password_blocking(password, &user.hashed_password).await {
            tracing::debug!(user_id = %user.id, "Basic credentials carry a wrong password");
            return None;
        }
        Some(user)
    }
}

#[async_trait]
impl AuthStrategy for BasicAuth {
    fn name(&self) -> &'static str {
        "basic_auth"
    }

    async fn current_user(&self, parts: &Parts) -> Option<User> {
        let header = self.authorization_header(parts);
        let payload = extract_base64_authorization_header(header);
        let decoded = decode_base64_authorization_header(payload)?;
        let (email, password) = extract_user_credentials(Some(decoded.as_str()))?;
        self.user_object_from_credentials(Some(email), Some(password))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::hash_password;
    use crate::userdb::InMemoryUserStore;
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use http::Request;
    use proptest::prelude::*;

    async fn auth_with_user(email: &str, password: &str) -> (BasicAuth, User) {
        let users = Arc::new(InMemoryUserStore::new());
        let hashed = hash_password(password).expect("hash");
        let user = users.insert(email, &hashed).await.expect("insert");
        (BasicAuth::new(users), user)
    }

    fn basic_parts(value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .uri("/api/v1/users/me")
            .header("Authorization", value)
            .body(())
            .expect("request")
            .into_parts();
        parts
    }

    #[test]
    fn test_extract_base64_authorization_header() {
        assert_eq!(extract_base64_authorization_header(Some("Basic QQ==")), Some("QQ=="));
        assert_eq!(extract_base64_authorization_header(Some("Basic ")), Some(""));
        assert_eq!(extract_base64_authorization_header(None), None);
        assert_eq!(extract_base64_authorization_header(Some("basic QQ==")), None);
        assert_eq!(extract_base64_authorization_header(Some("BasicQQ==")), None);
        assert_eq!(extract_base64_authorization_header(Some("Bearer QQ==")), None);
    }

    #[test]
    fn test_decode_base64_authorization_header() {
        assert_eq!(
            decode_base64_authorization_header(Some("SG9sYmVydG9u")).as_deref(),
            Some("Holberton")
        );
        assert_eq!(decode_base64_authorization_header(None), None);
        assert_eq!(decode_base64_authorization_header(Some("not base64!")), None);
        // Valid base64 of bytes that are not UTF-8
        assert_eq!(decode_base64_authorization_header(Some("/w==")), None);
    }

    #[test]
    fn test_extract_user_credentials() {
        assert_eq!(extract_user_credentials(Some("a:b:c")), Some(("a", "b:c")));
        assert_eq!(extract_user_credentials(Some("a:")), Some(("a", "")));
        assert_eq!(extract_user_credentials(Some("no-separator")), None);
        assert_eq!(extract_user_credentials(None), None);
    }

    #[tokio::test]
    async fn test_user_object_from_credentials() {
        let (auth, user) = auth_with_user("bob@hbtn.io", "H0lbertonSchool98!").await;

        let found = auth
            .user_object_from_credentials(Some("bob@hbtn.io"), Some("H0lbertonSchool98!"))
            .await;
        assert_eq!(found.map(|u| u.id), Some(user.id));

        assert!(
            auth.user_object_from_credentials(Some("bob@hbtn.io"), Some("wrong"))
                .await
                .is_none()
        );
        assert!(
            auth.user_object_from_credentials(Some("nobody@hbtn.io"), Some("H0lbertonSchool98!"))
                .await
                .is_none()
        );
        assert!(
            auth.user_object_from_credentials(None, Some("H0lbertonSchool98!"))
                .await
                .is_none()
        );
        assert!(
            auth.user_object_from_credentials(Some("bob@hbtn.io"), None)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_current_user_chain() {
        // Given a registered user whose password contains a colon
        let (auth, user) = auth_with_user("bob@hbtn.io", "pass:word").await;
        let header = format!("Basic {}", STANDARD.encode("bob@hbtn.io:pass:word"));

        // When the request carries matching Basic credentials
        let found = auth.current_user(&basic_parts(&header)).await;

        // Then the user is resolved
        assert_eq!(found.map(|u| u.email), Some(user.email));
    }

    #[tokio::test]
    async fn test_current_user_short_circuits() {
        let (auth, _) = auth_with_user("bob@hbtn.io", "pw").await;
        let wrong = format!("Basic {}", STANDARD.encode("bob@hbtn.io:nope"));
        let lowercase = format!("basic {}", STANDARD.encode("bob@hbtn.io:pw"));
        let no_colon = format!("Basic {}", STANDARD.encode("bob@hbtn.io"));

        for header in [wrong.as_str(), lowercase.as_str(), no_colon.as_str(), "Basic %%%"] {
            assert!(auth.current_user(&basic_parts(header)).await.is_none());
        }

        let (parts, _) = Request::builder()
            .body(())
            .expect("request")
            .into_parts();
        assert!(auth.current_user(&parts).await.is_none());
    }

    proptest! {
        #[test]
        fn prop_decode_round_trips_utf8(s in "\\PC*") {
            let encoded = STANDARD.encode(s.as_bytes());
            prop_assert_eq!(decode_base64_authorization_header(Some(encoded.as_str())), Some(s));
        }

        #[test]
        fn prop_split_on_first_colon(email in "[^:]*", password in ".*") {
            let decoded = format!("{email}:{password}");
            prop_assert_eq!(
                extract_user_credentials(Some(decoded.as_str())),
                Some((email.as_str(), password.as_str()))
            );
        }
    }
}
