//! Authentication error types.
//!
//! The credential pipeline itself never returns these: every rejection there
//! collapses into `None`. They cover the fallible edges around it (the user
//! directory, password hashing) and the HTTP rejections produced by the
//! middleware.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Errors that can occur around authentication.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request lacks credentials for a protected resource.
    #[error("Unauthorized")]
    Unauthorized,

    /// The supplied credentials do not identify a known user.
    #[error("Forbidden")]
    Forbidden,

    /// A user with the same identity already exists in the directory.
    #[error("Duplicate user: {email}")]
    DuplicateUser {
        /// The conflicting email address.
        email: String,
    },

    /// An error occurred while storing or retrieving users.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// Hashing a password failed.
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `DuplicateUser` error.
    #[must_use]
    pub fn duplicate_user(email: impl Into<String>) -> Self {
        Self::DuplicateUser {
            email: email.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this error is caused by the client's request.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized | Self::Forbidden | Self::DuplicateUser { .. }
        )
    }

    /// HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::DuplicateUser { .. } => StatusCode::CONFLICT,
            Self::Storage { .. } | Self::PasswordHash(_) | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Server-side failures keep their details in the logs only.
        let message = if self.is_client_error() {
            self.to_string()
        } else {
            tracing::error!(error = %self, "Authentication backend failure");
            "Internal server error".to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
