//! HTTP middleware for Basic authentication.
//!
//! - [`basic_auth`] - axum middleware guarding non-exempt paths
//! - [`BasicAuthState`] - resolver, exclusions and realm for the middleware
//! - [`CurrentUser`] - extractor for the authenticated user

pub mod basic_auth;
pub mod types;

pub use basic_auth::{BasicAuthState, basic_auth};
pub use types::CurrentUser;
