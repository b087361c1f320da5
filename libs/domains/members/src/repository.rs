use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{MemberError, MemberResult};
use crate::models::{Member, MemberRecord, normalize_email};

/// Repository trait for Member persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find a member by login email, ignoring case
    async fn find_by_email(&self, email: &str) -> MemberResult<Option<Member>>;

    /// Store a new member with its roles
    async fn create(&self, record: MemberRecord) -> MemberResult<Member>;

    /// Number of stored members
    async fn count(&self) -> MemberResult<u64>;
}

#[derive(Debug, Default)]
struct Store {
    next_id: i32,
    by_email: HashMap<String, Member>,
}

/// In-memory implementation of MemberRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryMemberRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn find_by_email(&self, email: &str) -> MemberResult<Option<Member>> {
        let store = self.store.read().await;
        Ok(store.by_email.get(&normalize_email(email)).cloned())
    }

    async fn create(&self, record: MemberRecord) -> MemberResult<Member> {
        let mut store = self.store.write().await;
        let email = normalize_email(&record.email);

        if store.by_email.contains_key(&email) {
            return Err(MemberError::DuplicateEmail(email));
        }

        store.next_id += 1;
        let member = Member {
            id: store.next_id,
            email: email.clone(),
            password: record.password_hash,
            roles: record.roles,
        };
        store.by_email.insert(email, member.clone());

        tracing::info!(member_id = member.id, "Created member");
        Ok(member)
    }

    async fn count(&self) -> MemberResult<u64> {
        Ok(self.store.read().await.by_email.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemberRole;

    fn record(email: &str) -> MemberRecord {
        MemberRecord {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            roles: [MemberRole::User].into_iter().collect(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_normalizes_email() {
        let repo = InMemoryMemberRepository::new();

        let first = repo.create(record("Kim@Example.com")).await.unwrap();
        let second = repo.create(record("lee@example.com")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.email, "kim@example.com");
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_find_is_case_insensitive() {
        let repo = InMemoryMemberRepository::new();
        repo.create(record("kim@example.com")).await.unwrap();

        let found = repo.find_by_email("KIM@EXAMPLE.COM").await.unwrap();
        assert!(found.is_some());
        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryMemberRepository::new();
        repo.create(record("kim@example.com")).await.unwrap();

        let result = repo.create(record("KIM@example.com")).await;
        assert!(matches!(result, Err(MemberError::DuplicateEmail(_))));
    }
}
