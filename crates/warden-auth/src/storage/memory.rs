//! In-memory user directory.

use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};

use crate::AuthResult;
use crate::error::AuthError;

use super::user::{User, UserAttribute, UserDirectory};

/// User directory backed by concurrent hash maps.
///
/// Emails are unique: a second user with the same email is rejected on
/// insert. Search results are ordered by creation time, then ID.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    /// id -> user
    users: DashMap<String, User>,
    /// email -> id
    emails: DashMap<String, String>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut users: Vec<User>) -> Vec<User> {
        users.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        users
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn search(&self, attribute: UserAttribute, value: &str) -> AuthResult<Vec<User>> {
        let matches = match attribute {
            UserAttribute::Id => self
                .users
                .get(value)
                .map(|u| vec![u.value().clone()])
                .unwrap_or_default(),
            UserAttribute::Email => {
                // Release the index guard before touching `users`.
                let id = self.emails.get(value).map(|id| id.value().clone());
                id.and_then(|id| self.users.get(&id).map(|u| u.value().clone()))
                    .into_iter()
                    .collect()
            }
        };
        Ok(Self::sorted(matches))
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        Ok(Self::sorted(
            self.users.iter().map(|u| u.value().clone()).collect(),
        ))
    }

    async fn insert(&self, user: User) -> AuthResult<()> {
        // Both entry guards are held until the user is stored, `emails` first.
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(AuthError::duplicate_user(user.email)),
            Entry::Vacant(email_slot) => match self.users.entry(user.id.clone()) {
                Entry::Occupied(_) => Err(AuthError::storage(format!(
                    "user id '{}' already exists",
                    user.id
                ))),
                Entry::Vacant(user_slot) => {
                    email_slot.insert(user.id.clone());
                    tracing::debug!(user_id = %user.id, "User added to directory");
                    user_slot.insert(user);
                    Ok(())
                }
            },
        }
    }

    async fn count(&self) -> AuthResult<usize> {
        Ok(self.users.len())
    }
}
