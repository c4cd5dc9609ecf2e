//! authkit - pluggable HTTP authentication for small REST services
//!
//! Authentication strategies (none, Basic, session cookie), a session
//! lifecycle with optional expiry and durable storage, and a credential
//! service with salted password hashing and reset tokens.

mod auth;
mod config;
mod context;
mod credential;
mod password;
mod session;
mod storage;
mod userdb;
mod utils;

pub use auth::{
    AuthStrategy, BasicAuth, ExcludedPath, NullAuth, SessionAuth, Strategy,
    decode_base64_authorization_header, extract_base64_authorization_header,
    extract_user_credentials, require_auth,
};

pub use config::{AuthConfig, AuthType, DEFAULT_SESSION_NAME, StoreType, parse_session_duration};

pub use context::{AuthContext, init};

pub use credential::{CredentialError, CredentialService};

pub use password::{
    PasswordError, hash_password, hash_password_blocking, verify_password,
    verify_password_blocking,
};

pub use session::{
    InMemorySessionStore, RedisSessionStore, SessionError, SessionKind, SessionLifecycleManager,
    SessionRecord, SessionStore, SqliteSessionStore,
};

pub use storage::{StorageError, connect_sqlite};

pub use userdb::{
    InMemoryUserStore, SqliteUserStore, User, UserError, UserSearchField, UserStore, UserUpdate,
};

pub use utils::{UtilError, gen_random_string, get_cookie, header_set_cookie};
