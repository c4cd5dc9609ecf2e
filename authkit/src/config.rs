//! Central configuration for the authkit crate
//!
//! Everything is resolved once at startup into an [`AuthConfig`] and handed to
//! the components that need it. Nothing reads the environment after that.

use std::env;
use std::fmt;
use std::str::FromStr;

/// Default cookie carrying the session identifier
pub const DEFAULT_SESSION_NAME: &str = "session_id";

/// Which authentication strategy guards the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    /// Base strategy: paths may require auth but nobody ever authenticates
    Auth,
    /// `Authorization: Basic` credentials checked against the user store
    BasicAuth,
    /// Session cookie, sessions kept in memory forever
    SessionAuth,
    /// Session cookie, sessions kept in memory with `SESSION_DURATION` expiry
    SessionExpAuth,
    /// Session cookie, sessions persisted in the session store with expiry
    SessionDbAuth,
}

impl FromStr for AuthType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auth" => Ok(Self::Auth),
            "basic_auth" => Ok(Self::BasicAuth),
            "session_auth" => Ok(Self::SessionAuth),
            "session_exp_auth" => Ok(Self::SessionExpAuth),
            "session_db_auth" => Ok(Self::SessionDbAuth),
            other => Err(format!("Unknown AUTH_TYPE: {other}")),
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Auth => "auth",
            Self::BasicAuth => "basic_auth",
            Self::SessionAuth => "session_auth",
            Self::SessionExpAuth => "session_exp_auth",
            Self::SessionDbAuth => "session_db_auth",
        };
        f.write_str(s)
    }
}

/// Backend kinds for the principal and session stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    Memory,
    Sqlite,
    Redis,
}

impl FromStr for StoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            "redis" => Ok(Self::Redis),
            other => Err(format!(
                "Unsupported store type: {other}. Supported types are 'memory', 'sqlite' and 'redis'"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthConfig {
    pub auth_type: Option<AuthType>,
    pub session_name: String,
    /// Seconds; `<= 0` disables expiry
    pub session_duration: i64,
    pub session_store_type: StoreType,
    pub session_store_url: String,
    pub user_store_type: StoreType,
    pub user_store_url: String,
    pub table_prefix: String,
    pub api_host: String,
    pub api_port: u16,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::from_lookup(|_: &str| None)
    }
}

impl AuthConfig {
    /// Resolve configuration from process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let auth_type = lookup("AUTH_TYPE").and_then(|s| match s.parse::<AuthType>() {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::warn!("{}; running without authentication", e);
                None
            }
        });

        let session_store_type = parse_store_type(&lookup, "SESSION_STORE_TYPE", StoreType::Sqlite);
        let user_store_type = match parse_store_type(&lookup, "USER_STORE_TYPE", StoreType::Memory)
        {
            StoreType::Redis => {
                tracing::warn!("USER_STORE_TYPE=redis is not supported; using memory");
                StoreType::Memory
            }
            t => t,
        };

        Self {
            auth_type,
            session_name: lookup("SESSION_NAME").unwrap_or_else(|| DEFAULT_SESSION_NAME.to_string()),
            session_duration: parse_session_duration(lookup("SESSION_DURATION").as_deref()),
            session_store_type,
            session_store_url: lookup("SESSION_STORE_URL")
                .unwrap_or_else(|| "sqlite::memory:".to_string()),
            user_store_type,
            user_store_url: lookup("USER_STORE_URL")
                .unwrap_or_else(|| "sqlite::memory:".to_string()),
            table_prefix: lookup("DB_TABLE_PREFIX").unwrap_or_else(|| "ak_".to_string()),
            api_host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            api_port: lookup("API_PORT")
                .and_then(|s| match s.parse() {
                    Ok(port) => Some(port),
                    Err(_) => {
                        tracing::warn!("Invalid API_PORT {:?}; using 5000", s);
                        None
                    }
                })
                .unwrap_or(5000),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    pub fn users_table(&self) -> String {
        format!("{}users", self.table_prefix)
    }

    pub fn sessions_table(&self) -> String {
        format!("{}user_sessions", self.table_prefix)
    }
}

/// A missing or unparseable value disables expiry instead of failing
pub fn parse_session_duration(value: Option<&str>) -> i64 {
    match value {
        None => 0,
        Some(s) => s.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid SESSION_DURATION {:?}; expiry disabled", s);
            0
        }),
    }
}

fn parse_store_type(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: StoreType,
) -> StoreType {
    match lookup(key) {
        None => default,
        Some(s) => s.parse().unwrap_or_else(|e| {
            tracing::warn!("{}; falling back to {:?}", e, default);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();

        assert_eq!(config.auth_type, None);
        assert_eq!(config.session_name, "session_id");
        assert_eq!(config.session_duration, 0);
        assert_eq!(config.session_store_type, StoreType::Sqlite);
        assert_eq!(config.user_store_type, StoreType::Memory);
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.users_table(), "ak_users");
        assert_eq!(config.sessions_table(), "ak_user_sessions");
    }

    #[test]
    fn test_auth_type_parsing() {
        for (raw, expected) in [
            ("auth", AuthType::Auth),
            ("basic_auth", AuthType::BasicAuth),
            ("session_auth", AuthType::SessionAuth),
            ("session_exp_auth", AuthType::SessionExpAuth),
            ("session_db_auth", AuthType::SessionDbAuth),
        ] {
            let config = AuthConfig::from_lookup(lookup_from(&[("AUTH_TYPE", raw)]));
            assert_eq!(config.auth_type, Some(expected));
            assert_eq!(expected.to_string(), raw);
        }
    }

    #[test]
    fn test_unknown_auth_type_behaves_as_unset() {
        let config = AuthConfig::from_lookup(lookup_from(&[("AUTH_TYPE", "Basic_Auth")]));
        assert_eq!(config.auth_type, None);
    }

    #[test]
    fn test_session_duration_parsing() {
        assert_eq!(parse_session_duration(None), 0);
        assert_eq!(parse_session_duration(Some("60")), 60);
        assert_eq!(parse_session_duration(Some(" 5 ")), 5);
        assert_eq!(parse_session_duration(Some("-3")), -3);
        assert_eq!(parse_session_duration(Some("ten")), 0);
        assert_eq!(parse_session_duration(Some("")), 0);
    }

    #[test]
    fn test_custom_values() {
        let config = AuthConfig::from_lookup(lookup_from(&[
            ("SESSION_NAME", "_my_session_id"),
            ("SESSION_DURATION", "120"),
            ("SESSION_STORE_TYPE", "redis"),
            ("SESSION_STORE_URL", "redis://localhost:6379"),
            ("USER_STORE_TYPE", "sqlite"),
            ("DB_TABLE_PREFIX", "t_"),
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "8080"),
        ]));

        assert_eq!(config.session_name, "_my_session_id");
        assert_eq!(config.session_duration, 120);
        assert_eq!(config.session_store_type, StoreType::Redis);
        assert_eq!(config.session_store_url, "redis://localhost:6379");
        assert_eq!(config.user_store_type, StoreType::Sqlite);
        assert_eq!(config.users_table(), "t_users");
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = AuthConfig::from_lookup(lookup_from(&[
            ("API_PORT", "not-a-port"),
            ("SESSION_STORE_TYPE", "mongodb"),
            ("USER_STORE_TYPE", "redis"),
        ]));

        assert_eq!(config.api_port, 5000);
        assert_eq!(config.session_store_type, StoreType::Sqlite);
        assert_eq!(config.user_store_type, StoreType::Memory);
    }

    const ENV_KEYS: [&str; 3] = ["AUTH_TYPE", "SESSION_DURATION", "API_PORT"];

    fn clear_env() {
        for key in ENV_KEYS {
            // Tests touching the environment are serialized
            unsafe { env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn test_from_env_reads_dotenv_values() {
        // Given variables loaded from a dotenv source
        clear_env();
        let dotenv = "AUTH_TYPE=session_exp_auth\nSESSION_DURATION=30\nAPI_PORT=8081\n";
        dotenvy::from_read(dotenv.as_bytes()).expect("dotenv");

        // When configuration is resolved from the environment
        let config = AuthConfig::from_env();

        // Then the values are picked up
        assert_eq!(config.auth_type, Some(AuthType::SessionExpAuth));
        assert_eq!(config.session_duration, 30);
        assert_eq!(config.api_port, 8081);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_without_variables() {
        clear_env();
        let config = AuthConfig::from_env();
        assert_eq!(config.auth_type, None);
        assert_eq!(config.session_duration, 0);
    }
}
