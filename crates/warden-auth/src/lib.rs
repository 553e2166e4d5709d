//! # warden-auth
//!
//! HTTP Basic authentication (RFC 7617) for axum services.
//!
//! A request goes through two decisions:
//!
//! 1. [`path::require_auth`] - is the path exempt from authentication?
//! 2. [`basic::BasicAuthResolver::resolve`] - do the `Authorization`
//!    credentials identify a known user with the right password?
//!
//! Both are total: the matcher always answers with a boolean and the
//! resolver with `Option<User>`. Every reason a credential can fail is
//! folded into `None`, so callers cannot tell a malformed header from a
//! wrong password.
//!
//! ## Modules
//!
//! - [`path`] - exempt path matching
//! - [`basic`] - credential extraction, decoding and resolution
//! - [`storage`] - users and the user directory
//! - [`password`] - Argon2id password hashing
//! - [`middleware`] - axum middleware and extractor
//! - [`config`] - authentication configuration
//! - [`error`] - error types

pub mod basic;
pub mod config;
pub mod error;
pub mod middleware;
pub mod password;
pub mod path;
pub mod storage;

pub use basic::{
    BasicAuthResolver, BasicCredentials, authorization_header, decode_credential,
    extract_encoded_credential, split_credential_pair,
};
pub use config::{AuthConfig, ConfigError};
pub use error::AuthError;
pub use middleware::{BasicAuthState, CurrentUser, basic_auth};
pub use path::require_auth;
pub use storage::{InMemoryUserDirectory, User, UserAttribute, UserBuilder, UserDirectory};

/// Type alias for authentication results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use warden_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::basic::BasicAuthResolver;
    pub use crate::config::AuthConfig;
    pub use crate::error::AuthError;
    pub use crate::middleware::{BasicAuthState, CurrentUser, basic_auth};
    pub use crate::path::require_auth;
    pub use crate::storage::{InMemoryUserDirectory, User, UserDirectory};
}
