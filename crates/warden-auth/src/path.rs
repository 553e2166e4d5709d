//! Path exclusion matching.
//!
//! Decides whether a request path is exempt from authentication. Paths are
//! compared exactly in canonical form, ending in exactly one `/`, so
//! `/api/v1/status` and `/api/v1/status/` are the same resource while
//! `/api/v1/stat` matches neither.

use std::borrow::Cow;

/// Returns `true` if `path` requires authentication.
///
/// - An absent path always requires authentication.
/// - An absent or empty exclusion list protects everything.
/// - Otherwise the path is exempt only when it equals one of the
///   excluded paths, both sides compared with a trailing slash.
///
/// # Example
///
/// ```
/// use warden_auth::path::require_auth;
///
/// let excluded = ["/api/v1/status/"];
/// assert!(!require_auth(Some("/api/v1/status"), Some(&excluded[..])));
/// assert!(require_auth(Some("/api/v1/users"), Some(&excluded[..])));
/// assert!(require_auth(None, Some(&excluded[..])));
/// ```
#[must_use]
pub fn require_auth<S: AsRef<str>>(path: Option<&str>, excluded_paths: Option<&[S]>) -> bool {
    let Some(path) = path else {
        return true;
    };
    let excluded_paths = match excluded_paths {
        Some(paths) if !paths.is_empty() => paths,
        _ => return true,
    };

    let path = canonical(path);
    !excluded_paths
        .iter()
        .any(|excluded| canonical(excluded.as_ref()) == path)
}

/// Canonical form: a single trailing slash. The empty path becomes `/`.
fn canonical(path: &str) -> Cow<'_, str> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.len() + 1 == path.len() {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("{trimmed}/"))
    }
}
