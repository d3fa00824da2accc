//! In-process `UserRepository` used when no database is configured.
//!
//! Records live behind one mutex, so the uniqueness check and the insert
//! happen atomically. Data is lost when the process exits.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, NewUser, User, UserId};

#[derive(Debug, Default)]
struct Store {
    next_id: i64,
    by_email: HashMap<EmailAddress, User>,
}

/// Mutex-guarded map of users keyed by normalised email.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    store: Mutex<Store>,
}

impl InMemoryUserRepository {
    /// Create an empty repository. Identifiers start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, UserPersistenceError> {
        self.store
            .lock()
            .map_err(|_| UserPersistenceError::connection("user store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError> {
        let mut store = self.lock()?;
        if store.by_email.contains_key(&user.email) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }

        store.next_id += 1;
        let stored = user.into_user(UserId::new(store.next_id));
        store
            .by_email
            .insert(stored.email().clone(), stored.clone());
        Ok(stored)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.by_email.get(email).cloned())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut store = self.lock()?;
        match store.by_email.get_mut(user.email()) {
            Some(existing) if existing.id() == user.id() => {
                *existing = user.clone();
                Ok(())
            }
            _ => Err(UserPersistenceError::query(format!(
                "user {} not found",
                user.id()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{DisplayName, Language, PasswordDigest};
    use rstest::{fixture, rstest};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: DisplayName::new("Ann").expect("valid name"),
            email: EmailAddress::parse(email).expect("valid email"),
            password_digest: PasswordDigest::new("digest"),
        }
    }

    #[fixture]
    fn repo() -> InMemoryUserRepository {
        InMemoryUserRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn assigns_sequential_ids(repo: InMemoryUserRepository) {
        let first = repo.insert(new_user("a@x.com")).await.expect("insert");
        let second = repo.insert(new_user("b@x.com")).await.expect("insert");

        assert_eq!(first.id(), UserId::new(1));
        assert_eq!(second.id(), UserId::new(2));
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_duplicate_email_case_insensitively(repo: InMemoryUserRepository) {
        repo.insert(new_user("ann@x.com")).await.expect("first insert");

        let err = repo
            .insert(new_user("ANN@x.com"))
            .await
            .expect_err("duplicate");

        assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn update_replaces_stored_record(repo: InMemoryUserRepository) {
        let mut user = repo.insert(new_user("ann@x.com")).await.expect("insert");
        user.demographics_mut().language = Some(Language::German);

        repo.update(&user).await.expect("update");
        let stored = repo
            .find_by_email(user.email())
            .await
            .expect("lookup")
            .expect("present");

        assert_eq!(stored.demographics().language, Some(Language::German));
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_unknown_user_fails(repo: InMemoryUserRepository) {
        let ghost = new_user("ghost@x.com").into_user(UserId::new(99));
        let err = repo.update(&ghost).await.expect_err("missing");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registrations_have_one_winner() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let shared = Arc::clone(&repo);
                tokio::spawn(async move { shared.insert(new_user("race@x.com")).await })
            })
            .collect();

        let mut winners = 0;
        for attempt in attempts {
            if attempt.await.expect("task joins").is_ok() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
    }
}
