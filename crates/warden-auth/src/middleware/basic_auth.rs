//! Basic authentication middleware.
//!
//! Runs the path exclusion check and then the credential resolver for every
//! request:
//!
//! - exempt path: the request passes through untouched
//! - no `Authorization` header: `401` with a `WWW-Authenticate` challenge
//! - credentials that do not resolve to a user: `403`
//! - otherwise the user is stored as a [`CurrentUser`] request extension
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware, routing::get};
//! use warden_auth::middleware::{BasicAuthState, CurrentUser, basic_auth};
//!
//! async fn me(CurrentUser(user): CurrentUser) -> String {
//!     user.display_name()
//! }
//!
//! let state = BasicAuthState::from_config(&config.auth, directory);
//! let app = Router::new()
//!     .route("/api/v1/users/me", get(me))
//!     .layer(middleware::from_fn_with_state(state, basic_auth));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header::AUTHORIZATION, header::WWW_AUTHENTICATE},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::basic::BasicAuthResolver;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::path::require_auth;
use crate::storage::UserDirectory;

use super::types::CurrentUser;

/// State for the [`basic_auth`] middleware.
#[derive(Clone)]
pub struct BasicAuthState {
    /// Resolver used for protected paths.
    pub resolver: BasicAuthResolver,

    /// Paths that skip authentication.
    pub excluded_paths: Arc<[String]>,

    /// Realm advertised in the challenge.
    pub realm: Arc<str>,
}

impl BasicAuthState {
    /// Creates a state with the default exclusions and realm.
    pub fn new(resolver: BasicAuthResolver) -> Self {
        let defaults = AuthConfig::default();
        Self {
            resolver,
            excluded_paths: defaults.excluded_paths.into(),
            realm: defaults.realm.into(),
        }
    }

    /// Creates a state from configuration and a user directory.
    pub fn from_config(config: &AuthConfig, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            resolver: BasicAuthResolver::new(directory),
            excluded_paths: config.excluded_paths.clone().into(),
            realm: config.realm.as_str().into(),
        }
    }

    /// Replaces the excluded paths.
    #[must_use]
    pub fn with_excluded_paths(mut self, paths: Vec<String>) -> Self {
        self.excluded_paths = paths.into();
        self
    }

    /// Returns `true` if a request for `path` must authenticate.
    pub fn requires_auth(&self, path: &str) -> bool {
        require_auth(Some(path), Some(&*self.excluded_paths))
    }

    fn challenge(&self) -> Response {
        let mut response = AuthError::Unauthorized.into_response();
        if let Ok(value) = HeaderValue::from_str(&format!("Basic realm=\"{}\"", self.realm)) {
            response.headers_mut().insert(WWW_AUTHENTICATE, value);
        }
        response
    }
}

/// Axum middleware enforcing Basic authentication.
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn basic_auth(
    State(state): State<BasicAuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    if !state.requires_auth(request.uri().path()) {
        return next.run(request).await;
    }

    if !request.headers().contains_key(AUTHORIZATION) {
        tracing::debug!(path = %request.uri().path(), "Missing Authorization header");
        return state.challenge();
    }

    let Some(user) = state.resolver.current_user(request.headers()).await else {
        return AuthError::Forbidden.into_response();
    };

    request.extensions_mut().insert(CurrentUser(user));
    next.run(request).await
}
