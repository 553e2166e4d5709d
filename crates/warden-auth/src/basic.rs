//! Basic credential resolution (RFC 7617).
//!
//! Turns an `Authorization` header into a verified [`User`] in four steps:
//!
//! 1. [`extract_encoded_credential`] - strip the `Basic ` scheme prefix
//! 2. [`decode_credential`] - Base64 then UTF-8 decode
//! 3. [`split_credential_pair`] - split `identity:secret` on the first colon
//! 4. [`BasicAuthResolver::resolve_principal`] - look the identity up and
//!    verify the secret
//!
//! Every step is total. Any failure yields `None` and the remaining steps
//! are skipped, so a missing header, a malformed one, an unknown user and a
//! wrong password all look the same to the caller. The individual reason is
//! only recorded in `debug` level tracing.

use std::fmt;
use std::sync::Arc;

use axum::http::{HeaderMap, header::AUTHORIZATION};
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::storage::{User, UserAttribute, UserDirectory};

/// Scheme prefix of a Basic `Authorization` header, including the space.
pub const BASIC_PREFIX: &str = "Basic ";

/// Reads the `Authorization` header as text.
///
/// Returns `None` if the header is missing or is not visible ASCII.
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

/// Returns the encoded credential following the `Basic ` prefix.
///
/// The prefix match is exact and case-sensitive. The remainder is returned
/// unmodified; it may be empty or not Base64 at all.
pub fn extract_encoded_credential(header: Option<&str>) -> Option<&str> {
    header?.strip_prefix(BASIC_PREFIX)
}

/// Decodes a standard, padded Base64 credential into a UTF-8 string.
pub fn decode_credential(encoded: Option<&str>) -> Option<String> {
    let bytes = STANDARD.decode(encoded?).ok()?;
    String::from_utf8(bytes).ok()
}

/// An identity and secret pair taken from a decoded Basic credential.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// Text before the first colon.
    pub identity: String,
    /// Text after the first colon, which may itself contain colons.
    pub secret: String,
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("identity", &self.identity)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Splits `identity:secret` on the first colon.
///
/// Returns `None` if there is no colon.
pub fn split_credential_pair(decoded: Option<&str>) -> Option<BasicCredentials> {
    let (identity, secret) = decoded?.split_once(':')?;
    Some(BasicCredentials {
        identity: identity.to_string(),
        secret: secret.to_string(),
    })
}

fn rejected(reason: &'static str) {
    tracing::debug!(reason, "Basic credentials rejected");
}

/// Resolves Basic credentials against a [`UserDirectory`].
///
/// Holds no state besides the directory handle; cloning is cheap and the
/// resolver can be shared across tasks.
#[derive(Clone)]
pub struct BasicAuthResolver {
    directory: Arc<dyn UserDirectory>,
}

impl BasicAuthResolver {
    /// Creates a resolver backed by `directory`.
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// The directory users are resolved against.
    pub fn directory(&self) -> &Arc<dyn UserDirectory> {
        &self.directory
    }

    /// Finds the user with email `identity` and verifies `secret`.
    ///
    /// When the directory returns several users for one email, the first
    /// one is used. Directory failures count as a rejection.
    pub async fn resolve_principal(
        &self,
        identity: Option<&str>,
        secret: Option<&str>,
    ) -> Option<User> {
        let (Some(identity), Some(secret)) = (identity, secret) else {
            rejected("missing_credentials");
            return None;
        };

        let users = match self.directory.search(UserAttribute::Email, identity).await {
            Ok(users) => users,
            Err(e) => {
                tracing::warn!(error = %e, "User directory lookup failed");
                return None;
            }
        };

        if users.len() > 1 {
            tracing::warn!(
                matches = users.len(),
                "Several users share one email, using the first"
            );
        }

        let Some(user) = users.into_iter().next() else {
            rejected("unknown_identity");
            return None;
        };

        if !user.verify_password(secret) {
            tracing::debug!(user_id = %user.id, reason = "wrong_secret", "Basic credentials rejected");
            return None;
        }

        Some(user)
    }

    /// Resolves a raw `Authorization` header value to a verified user.
    pub async fn resolve(&self, header: Option<&str>) -> Option<User> {
        let Some(encoded) = extract_encoded_credential(header) else {
            rejected("not_basic_scheme");
            return None;
        };
        let Some(decoded) = decode_credential(Some(encoded)) else {
            rejected("malformed_encoding");
            return None;
        };
        let Some(credentials) = split_credential_pair(Some(&decoded)) else {
            rejected("missing_delimiter");
            return None;
        };

        let user = self
            .resolve_principal(Some(&credentials.identity), Some(&credentials.secret))
            .await?;

        tracing::info!(user_id = %user.id, "User authenticated via Basic Auth");
        Some(user)
    }

    /// Resolves the user for a request from its headers.
    pub async fn current_user(&self, headers: &HeaderMap) -> Option<User> {
        self.resolve(authorization_header(headers)).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::http::HeaderValue;

    use super::*;
    use crate::AuthResult;
    use crate::error::AuthError;
    use crate::storage::InMemoryUserDirectory;

    fn basic(payload: &str) -> String {
        format!("Basic {}", STANDARD.encode(payload))
    }

    async fn resolver_with_bob() -> (BasicAuthResolver, User) {
        let directory = InMemoryUserDirectory::new();
        let bob = User::builder("bob@example.com")
            .password("hunter2")
            .unwrap()
            .build();
        directory.insert(bob.clone()).await.unwrap();
        (BasicAuthResolver::new(Arc::new(directory)), bob)
    }

    // ── extract_encoded_credential ───────────────────────────────────

    #[test]
    fn test_extract_encoded_credential() {
        assert_eq!(
            extract_encoded_credential(Some("Basic QWxhZGRpbjpvcGVuc2VzYW1l")),
            Some("QWxhZGRpbjpvcGVuc2VzYW1l")
        );
        assert_eq!(extract_encoded_credential(Some("Basic ")), Some(""));
        assert_eq!(extract_encoded_credential(Some("Basic !!")), Some("!!"));
    }

    #[test]
    fn test_extract_rejects_other_schemes() {
        assert_eq!(extract_encoded_credential(None), None);
        assert_eq!(extract_encoded_credential(Some("Bearer xyz")), None);
        assert_eq!(extract_encoded_credential(Some("basic QWxh")), None);
        assert_eq!(extract_encoded_credential(Some("Basic")), None);
        assert_eq!(extract_encoded_credential(Some("BasicQWxh")), None);
        assert_eq!(extract_encoded_credential(Some(" Basic QWxh")), None);
    }

    #[test]
    fn test_authorization_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(authorization_header(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic QWxh"));
        assert_eq!(authorization_header(&headers), Some("Basic QWxh"));

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Basic \xffQWxh").unwrap(),
        );
        assert_eq!(authorization_header(&headers), None);
    }

    // ── decode_credential ────────────────────────────────────────────

    #[test]
    fn test_decode_credential() {
        assert_eq!(
            decode_credential(Some("QWxhZGRpbjpvcGVuc2VzYW1l")).as_deref(),
            Some("Aladdin:opensesame")
        );
        assert_eq!(decode_credential(Some("")).as_deref(), Some(""));
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        assert_eq!(decode_credential(None), None);
        assert_eq!(decode_credential(Some("not-base64!!")), None);
        // Missing padding.
        assert_eq!(decode_credential(Some("QWxhZGRpbg")), None);
        // Valid Base64 of bytes that are not UTF-8.
        assert_eq!(decode_credential(Some(&STANDARD.encode([0xffu8, 0xfe, 0x3a]))), None);
    }

    // ── split_credential_pair ────────────────────────────────────────

    #[test]
    fn test_split_on_first_colon_only() {
        let credentials = split_credential_pair(Some("Aladdin:open:sesame")).unwrap();
        assert_eq!(credentials.identity, "Aladdin");
        assert_eq!(credentials.secret, "open:sesame");
    }

    #[test]
    fn test_split_edge_cases() {
        assert_eq!(split_credential_pair(None), None);
        assert_eq!(split_credential_pair(Some("noColonHere")), None);

        let empty_secret = split_credential_pair(Some("bob@example.com:")).unwrap();
        assert_eq!(empty_secret.identity, "bob@example.com");
        assert_eq!(empty_secret.secret, "");

        let empty_identity = split_credential_pair(Some(":hunter2")).unwrap();
        assert_eq!(empty_identity.identity, "");
        assert_eq!(empty_identity.secret, "hunter2");
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let credentials = split_credential_pair(Some("bob@example.com:hunter2")).unwrap();
        let debug = format!("{credentials:?}");
        assert!(debug.contains("bob@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    // ── resolve_principal ────────────────────────────────────────────

    #[tokio::test]
    async fn test_resolve_principal() {
        let (resolver, bob) = resolver_with_bob().await;

        let found = resolver
            .resolve_principal(Some("bob@example.com"), Some("hunter2"))
            .await;
        assert_eq!(found, Some(bob));

        assert!(resolver.resolve_principal(Some("bob@example.com"), Some("wrong")).await.is_none());
        assert!(resolver.resolve_principal(Some("eve@example.com"), Some("hunter2")).await.is_none());
        assert!(resolver.resolve_principal(None, Some("hunter2")).await.is_none());
        assert!(resolver.resolve_principal(Some("bob@example.com"), None).await.is_none());
    }

    // ── resolve ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_resolve_end_to_end() {
        let (resolver, bob) = resolver_with_bob().await;

        let ok = resolver.resolve(Some(&basic("bob@example.com:hunter2"))).await;
        assert_eq!(ok, Some(bob));

        assert!(resolver.resolve(Some(&basic("bob@example.com:wrong"))).await.is_none());
        assert!(resolver.resolve(Some(&basic("nouser@example.com:hunter2"))).await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_rejects_every_malformed_stage() {
        let (resolver, _) = resolver_with_bob().await;

        assert!(resolver.resolve(None).await.is_none());
        assert!(resolver.resolve(Some("Bearer xyz")).await.is_none());
        assert!(resolver.resolve(Some("Basic not-base64!!")).await.is_none());
        assert!(resolver.resolve(Some(&basic("bob@example.comhunter2"))).await.is_none());
        assert!(resolver.resolve(Some("Basic ")).await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_secret_with_colons() {
        let directory = InMemoryUserDirectory::new();
        let user = User::builder("ali@example.com")
            .password("open:sesame")
            .unwrap()
            .build();
        directory.insert(user.clone()).await.unwrap();
        let resolver = BasicAuthResolver::new(Arc::new(directory));

        let found = resolver.resolve(Some(&basic("ali@example.com:open:sesame"))).await;
        assert_eq!(found, Some(user));
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let (resolver, _) = resolver_with_bob().await;
        let good = basic("bob@example.com:hunter2");
        let bad = basic("bob@example.com:wrong");

        assert_eq!(resolver.resolve(Some(&good)).await, resolver.resolve(Some(&good)).await);
        assert_eq!(resolver.resolve(Some(&bad)).await, resolver.resolve(Some(&bad)).await);
        assert_eq!(resolver.directory().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_current_user_reads_authorization_header() {
        let (resolver, bob) = resolver_with_bob().await;
        let mut headers = HeaderMap::new();
        assert!(resolver.current_user(&headers).await.is_none());

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&basic("bob@example.com:hunter2")).unwrap(),
        );
        assert_eq!(resolver.current_user(&headers).await, Some(bob));
    }

    // ── directory edge cases ─────────────────────────────────────────

    struct FailingDirectory;

    #[async_trait]
    impl UserDirectory for FailingDirectory {
        async fn search(&self, _: UserAttribute, _: &str) -> AuthResult<Vec<User>> {
            Err(AuthError::storage("connection refused"))
        }

        async fn list(&self) -> AuthResult<Vec<User>> {
            Err(AuthError::storage("connection refused"))
        }

        async fn insert(&self, _: User) -> AuthResult<()> {
            Err(AuthError::storage("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_directory_failure_is_a_rejection() {
        let resolver = BasicAuthResolver::new(Arc::new(FailingDirectory));
        assert!(resolver.resolve(Some(&basic("bob@example.com:hunter2"))).await.is_none());
    }

    /// Directory without a uniqueness constraint on email.
    struct DuplicatingDirectory(Vec<User>);

    #[async_trait]
    impl UserDirectory for DuplicatingDirectory {
        async fn search(&self, attribute: UserAttribute, value: &str) -> AuthResult<Vec<User>> {
            Ok(self
                .0
                .iter()
                .filter(|u| attribute.value_of(u) == value)
                .cloned()
                .collect())
        }

        async fn list(&self) -> AuthResult<Vec<User>> {
            Ok(self.0.clone())
        }

        async fn insert(&self, _: User) -> AuthResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_first_match_wins_for_shared_email() {
        let first = User::builder("bob@example.com")
            .id("first")
            .password("hunter2")
            .unwrap()
            .build();
        let second = User::builder("bob@example.com")
            .id("second")
            .password("other")
            .unwrap()
            .build();
        let resolver = BasicAuthResolver::new(Arc::new(DuplicatingDirectory(vec![
            first.clone(),
            second,
        ])));

        assert_eq!(
            resolver.resolve(Some(&basic("bob@example.com:hunter2"))).await,
            Some(first)
        );
        // The second user's password is never tried.
        assert!(resolver.resolve(Some(&basic("bob@example.com:other"))).await.is_none());
    }
}
