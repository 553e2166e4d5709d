//! Startup seeding of the user directory.

use tracing::{info, warn};
use warden_auth::{AuthResult, User, UserAttribute, UserDirectory};

use crate::config::SeedUserConfig;

/// Result of a bootstrap run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapStats {
    pub created: usize,
    pub skipped: usize,
}

/// Inserts the configured users, hashing their passwords.
///
/// Idempotent: users whose email already exists are skipped.
///
/// # Errors
///
/// Returns an error if hashing a password or a directory operation fails.
pub async fn bootstrap_users(
    directory: &dyn UserDirectory,
    users: &[SeedUserConfig],
) -> AuthResult<BootstrapStats> {
    let mut stats = BootstrapStats::default();

    for seed in users {
        if !directory
            .search(UserAttribute::Email, &seed.email)
            .await?
            .is_empty()
        {
            warn!(email = %seed.email, "Bootstrap user already exists, skipping");
            stats.skipped += 1;
            continue;
        }

        let mut builder = User::builder(&seed.email).password(&seed.password)?;
        if let Some(first_name) = &seed.first_name {
            builder = builder.first_name(first_name);
        }
        if let Some(last_name) = &seed.last_name {
            builder = builder.last_name(last_name);
        }
        let user = builder.build();
        let user_id = user.id.clone();

        directory.insert(user).await?;
        info!(user_id = %user_id, "Bootstrap user created");
        stats.created += 1;
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use warden_auth::InMemoryUserDirectory;

    use super::*;

    fn seed(email: &str, password: &str) -> SeedUserConfig {
        SeedUserConfig {
            email: email.into(),
            password: password.into(),
            first_name: Some("Bob".into()),
            last_name: None,
        }
    }

    #[tokio::test]
    async fn test_bootstrap_creates_users_with_hashed_passwords() {
        let directory = InMemoryUserDirectory::new();
        let stats = bootstrap_users(&directory, &[seed("bob@example.com", "hunter2")])
            .await
            .unwrap();
        assert_eq!(stats, BootstrapStats { created: 1, skipped: 0 });

        let users = directory
            .search(UserAttribute::Email, "bob@example.com")
            .await
            .unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].display_name(), "Bob");
        assert!(users[0].verify_password("hunter2"));
    }

    struct RejectingDirectory;

    #[async_trait::async_trait]
    impl UserDirectory for RejectingDirectory {
        async fn search(&self, _: UserAttribute, _: &str) -> AuthResult<Vec<User>> {
            Ok(Vec::new())
        }

        async fn list(&self) -> AuthResult<Vec<User>> {
            Ok(Vec::new())
        }

        async fn insert(&self, _: User) -> AuthResult<()> {
            Err(warden_auth::AuthError::storage("directory is read-only"))
        }
    }

    #[tokio::test]
    async fn test_bootstrap_propagates_insert_failure() {
        let err = bootstrap_users(&RejectingDirectory, &[seed("bob@example.com", "hunter2")])
            .await
            .unwrap_err();
        assert!(matches!(err, warden_auth::AuthError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let directory = InMemoryUserDirectory::new();
        let seeds = [seed("bob@example.com", "hunter2")];
        bootstrap_users(&directory, &seeds).await.unwrap();
        let stats = bootstrap_users(&directory, &seeds).await.unwrap();

        assert_eq!(stats, BootstrapStats { created: 0, skipped: 1 });
        assert_eq!(directory.count().await.unwrap(), 1);
    }
}
