//! User directory for Basic authentication.
//!
//! This module defines:
//!
//! - [`User`] - the principal a request acts as
//! - [`UserDirectory`] - lookup by attribute and persistence of users
//! - [`InMemoryUserDirectory`] - a concurrent in-process implementation

pub mod memory;
pub mod user;

pub use memory::InMemoryUserDirectory;
pub use user::{User, UserAttribute, UserBuilder, UserDirectory};
