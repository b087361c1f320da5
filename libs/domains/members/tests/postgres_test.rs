//! PostgreSQL repository tests. Run with `cargo test -- --ignored` (needs Docker).

use domain_members::{
    MemberError, MemberRepository, MemberRole, MemberService, NewMember, PgMemberRepository,
};
use test_utils::{TestDataBuilder, TestDatabase};

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_register_and_authenticate() {
    let db = TestDatabase::new().await;
    let service = MemberService::new(PgMemberRepository::new(db.connection()));
    let email = TestDataBuilder::from_test_name("test_register_and_authenticate").email("admin");

    let member = service
        .register(NewMember::new(
            email.clone(),
            "admin",
            [MemberRole::Admin, MemberRole::User],
        ))
        .await
        .unwrap();
    assert_eq!(member.roles.len(), 2);

    let principal = service
        .authenticate(&email.to_uppercase(), "admin")
        .await
        .unwrap();
    assert_eq!(principal.username(), email);
    assert!(principal.has_role(MemberRole::Admin));

    let err = service.authenticate(&email, "wrong").await.unwrap_err();
    assert!(matches!(err, MemberError::InvalidCredentials));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_email_is_conflict() {
    let db = TestDatabase::new().await;
    let repo = PgMemberRepository::new(db.connection());
    let service = MemberService::new(repo.clone());
    let email = TestDataBuilder::from_test_name("test_duplicate_email").email("user");

    service
        .register(NewMember::new(email.clone(), "user", [MemberRole::User]))
        .await
        .unwrap();
    let err = service
        .register(NewMember::new(email.to_uppercase(), "user", [MemberRole::User]))
        .await
        .unwrap_err();
    assert!(matches!(err, MemberError::DuplicateEmail(_)));

    assert!(!service
        .ensure_member(NewMember::new(email, "user", [MemberRole::User]))
        .await
        .unwrap());
    assert_eq!(repo.count().await.unwrap(), 1);
    assert_eq!(db.row_count("members").await, 1);
    assert_eq!(db.row_count("member_roles").await, 1);
}
