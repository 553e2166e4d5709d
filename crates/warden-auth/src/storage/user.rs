//! User type and directory trait.
//!
//! A [`User`] is the principal a request acts as once its credentials
//! verify. The [`UserDirectory`] owns users; the authentication pipeline
//! only searches it and asks users to verify a presented password.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::AuthResult;
use crate::password;

fn default_datetime() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

// =============================================================================
// User Type
// =============================================================================

/// A user known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (UUID v4 unless set explicitly).
    pub id: String,

    /// Email address. This is the identity presented in Basic credentials.
    pub email: String,

    /// Argon2id PHC password hash. `None` means the user cannot log in
    /// with a password.
    ///
    /// Never serialized.
    #[serde(default, skip_serializing, alias = "passwordHash")]
    pub password_hash: Option<String>,

    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "firstName")]
    pub first_name: Option<String>,

    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "lastName")]
    pub last_name: Option<String>,

    /// When the user was created.
    #[serde(default = "default_datetime", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// When the user was last updated.
    #[serde(default = "default_datetime", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Creates a new user with the given email and no password.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into(),
            password_hash: None,
            first_name: None,
            last_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a new user builder.
    #[must_use]
    pub fn builder(email: impl Into<String>) -> UserBuilder {
        UserBuilder::new(email)
    }

    /// Human readable name.
    ///
    /// Full name when both parts are known, otherwise whichever part is
    /// known, otherwise the email.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone(),
        }
    }

    /// Returns `true` if `candidate` matches the stored password hash.
    ///
    /// A user without a password, or with a corrupt hash, never verifies.
    #[must_use]
    pub fn verify_password(&self, candidate: &str) -> bool {
        let Some(hash) = self.password_hash.as_deref() else {
            return false;
        };
        match password::verify_password(candidate, hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!(user_id = %self.id, error = %e, "Stored password hash is malformed");
                false
            }
        }
    }
}

// =============================================================================
// User Builder
// =============================================================================

/// Builder for creating `User` instances.
pub struct UserBuilder {
    user: User,
}

impl UserBuilder {
    fn new(email: impl Into<String>) -> Self {
        Self {
            user: User::new(email),
        }
    }

    /// Sets the user ID.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.user.id = id.into();
        self
    }

    /// Sets an already hashed password.
    #[must_use]
    pub fn password_hash(mut self, hash: impl Into<String>) -> Self {
        self.user.password_hash = Some(hash.into());
        self
    }

    /// Hashes and sets a plaintext password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub fn password(mut self, plaintext: &str) -> AuthResult<Self> {
        self.user.password_hash = Some(password::hash_password(plaintext)?);
        Ok(self)
    }

    /// Sets the given name.
    #[must_use]
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.user.first_name = Some(first_name.into());
        self
    }

    /// Sets the family name.
    #[must_use]
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.user.last_name = Some(last_name.into());
        self
    }

    /// Builds the user.
    #[must_use]
    pub fn build(self) -> User {
        self.user
    }
}

// =============================================================================
// User Directory Trait
// =============================================================================

/// Attribute a directory search filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAttribute {
    /// The user ID.
    Id,
    /// The email address.
    Email,
}

impl UserAttribute {
    /// Value of this attribute on `user`.
    #[must_use]
    pub fn value_of<'a>(&self, user: &'a User) -> &'a str {
        match self {
            Self::Id => &user.id,
            Self::Email => &user.email,
        }
    }
}

/// Lookup and persistence operations for users.
///
/// Implementations own their concurrency guarantees; callers may share a
/// directory across any number of tasks.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find users whose `attribute` equals `value` exactly.
    ///
    /// Results are ordered; callers that need a single user take the first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn search(&self, attribute: UserAttribute, value: &str) -> AuthResult<Vec<User>>;

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn list(&self) -> AuthResult<Vec<User>>;

    /// Store a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if a user with the same ID or email already exists,
    /// or if the storage operation fails.
    async fn insert(&self, user: User) -> AuthResult<()>;

    /// Find a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn get(&self, id: &str) -> AuthResult<Option<User>> {
        Ok(self.search(UserAttribute::Id, id).await?.into_iter().next())
    }

    /// Number of stored users.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn count(&self) -> AuthResult<usize> {
        Ok(self.list().await?.len())
    }
}

// =============================================================================
// Tests
// =============================================================================
