use std::sync::Arc;

use crate::error::{MemberError, MemberResult};
use crate::models::{Member, MemberRecord, NewMember, Principal};
use crate::password::{hash_password, verify_dummy, verify_password};
use crate::repository::MemberRepository;

/// Service layer for member lookup and credential checks
#[derive(Clone)]
pub struct MemberService<R: MemberRepository> {
    repository: Arc<R>,
}

impl<R: MemberRepository> MemberService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Resolve a login email to its principal
    pub async fn load_principal(&self, email: &str) -> MemberResult<Principal> {
        let member = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| MemberError::UsernameNotFound(email.to_string()))?;

        tracing::debug!(member_id = member.id, "Loaded principal");
        Ok(Principal::from(&member))
    }

    /// Check a login email and plaintext password.
    ///
    /// Unknown emails and wrong passwords both yield
    /// [`MemberError::InvalidCredentials`], and both run one argon2 verify.
    pub async fn authenticate(&self, email: &str, password: &str) -> MemberResult<Principal> {
        let principal = match self.load_principal(email).await {
            Ok(principal) => principal,
            Err(MemberError::UsernameNotFound(_)) => {
                verify_dummy(password);
                return Err(MemberError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        if !verify_password(password, principal.password_hash())? {
            return Err(MemberError::InvalidCredentials);
        }

        Ok(principal)
    }

    /// Hash the password and store a new member
    pub async fn register(&self, input: NewMember) -> MemberResult<Member> {
        if input.roles.is_empty() {
            return Err(MemberError::NoRoles);
        }

        let record = MemberRecord {
            email: input.email,
            password_hash: hash_password(&input.password)?,
            roles: input.roles,
        };

        self.repository.create(record).await
    }

    /// Register `input` unless a member with that email exists.
    /// Returns whether a member was created.
    pub async fn ensure_member(&self, input: NewMember) -> MemberResult<bool> {
        if self.repository.find_by_email(&input.email).await?.is_some() {
            tracing::debug!("Seed member already present");
            return Ok(false);
        }

        match self.register(input).await {
            Ok(member) => {
                tracing::info!(member_id = member.id, "Seeded member");
                Ok(true)
            }
            // Another instance seeded it first
            Err(MemberError::DuplicateEmail(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Ensure every seed member exists. Returns how many were created.
    pub async fn seed(&self, members: impl IntoIterator<Item = NewMember>) -> MemberResult<usize> {
        let mut created = 0;
        for member in members {
            if self.ensure_member(member).await? {
                created += 1;
            }
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemberRole;
    use crate::repository::MockMemberRepository;

    fn stored(email: &str, password: &str) -> Member {
        Member {
            id: 1,
            email: email.to_string(),
            password: hash_password(password).unwrap(),
            roles: [MemberRole::Admin, MemberRole::User].into_iter().collect(),
        }
    }

    #[tokio::test]
    async fn test_load_principal_maps_roles_to_authorities() {
        let mut mock_repo = MockMemberRepository::new();
        let member = stored("keesun@email.com", "keesun");

        mock_repo
            .expect_find_by_email()
            .withf(|email| email == "keesun@email.com")
            .returning(move |_| Ok(Some(member.clone())));

        let service = MemberService::new(mock_repo);
        let principal = service.load_principal("keesun@email.com").await.unwrap();

        assert_eq!(principal.username(), "keesun@email.com");
        assert!(principal.has_authority("ROLE_ADMIN"));
        assert!(principal.has_authority("ROLE_USER"));
        assert_eq!(principal.authorities().len(), 2);
    }

    #[tokio::test]
    async fn test_load_principal_unknown_email() {
        let mut mock_repo = MockMemberRepository::new();
        mock_repo.expect_find_by_email().returning(|_| Ok(None));

        let service = MemberService::new(mock_repo);
        let result = service.load_principal("random@email.com").await;

        assert!(
            matches!(result, Err(MemberError::UsernameNotFound(ref email)) if email == "random@email.com")
        );
    }

    #[tokio::test]
    async fn test_authenticate_checks_password() {
        let mut mock_repo = MockMemberRepository::new();
        let member = stored("keesun@email.com", "keesun");
        mock_repo
            .expect_find_by_email()
            .returning(move |_| Ok(Some(member.clone())));

        let service = MemberService::new(mock_repo);

        assert!(service.authenticate("keesun@email.com", "keesun").await.is_ok());
        assert!(matches!(
            service.authenticate("keesun@email.com", "nope").await,
            Err(MemberError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email_is_invalid_credentials() {
        let mut mock_repo = MockMemberRepository::new();
        mock_repo.expect_find_by_email().returning(|_| Ok(None));

        let service = MemberService::new(mock_repo);
        assert!(matches!(
            service.authenticate("ghost@email.com", "x").await,
            Err(MemberError::InvalidCredentials)
        ));
        // The dummy hash's own password must not log anyone in
        assert!(matches!(
            service.authenticate("ghost@email.com", "no-such-member").await,
            Err(MemberError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut mock_repo = MockMemberRepository::new();
        mock_repo
            .expect_create()
            .withf(|record| record.password_hash.starts_with("$argon2") && record.password_hash != "plain")
            .returning(|record| {
                Ok(Member {
                    id: 9,
                    email: record.email,
                    password: record.password_hash,
                    roles: record.roles,
                })
            });

        let service = MemberService::new(mock_repo);
        let member = service
            .register(NewMember::new("new@email.com", "plain", [MemberRole::User]))
            .await
            .unwrap();

        assert_eq!(member.id, 9);
    }

    #[tokio::test]
    async fn test_register_requires_roles() {
        let mock_repo = MockMemberRepository::new();
        let service = MemberService::new(mock_repo);

        let result = service
            .register(NewMember::new("new@email.com", "plain", []))
            .await;
        assert!(matches!(result, Err(MemberError::NoRoles)));
    }

    #[tokio::test]
    async fn test_ensure_member_skips_existing() {
        let mut mock_repo = MockMemberRepository::new();
        let member = stored("admin@email.com", "admin");
        mock_repo
            .expect_find_by_email()
            .returning(move |_| Ok(Some(member.clone())));
        mock_repo.expect_create().never();

        let service = MemberService::new(mock_repo);
        let created = service
            .ensure_member(NewMember::new("admin@email.com", "admin", [MemberRole::Admin]))
            .await
            .unwrap();

        assert!(!created);
    }
}
