use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    SqlErr, TransactionTrait,
};

use crate::{
    entity::{member, member_role},
    error::{MemberError, MemberResult},
    models::{Member, MemberRecord, normalize_email},
    repository::MemberRepository,
};

#[derive(Clone)]
pub struct PgMemberRepository {
    db: DatabaseConnection,
}

impl PgMemberRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    async fn find_by_email(&self, email: &str) -> MemberResult<Option<Member>> {
        let found = member::Entity::find()
            .filter(member::Column::Email.eq(normalize_email(email)))
            .find_with_related(member_role::Entity)
            .all(&self.db)
            .await?;

        Ok(found.into_iter().next().map(Member::from))
    }

    async fn create(&self, record: MemberRecord) -> MemberResult<Member> {
        let email = normalize_email(&record.email);
        let txn = self.db.begin().await?;

        let inserted = member::ActiveModel {
            email: Set(email.clone()),
            password: Set(record.password_hash),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => MemberError::DuplicateEmail(email.clone()),
            _ => MemberError::Database(e),
        })?;

        let roles = record.roles.iter().map(|role| member_role::ActiveModel {
            member_id: Set(inserted.id),
            role: Set(*role),
        });
        member_role::Entity::insert_many(roles).exec(&txn).await?;

        txn.commit().await?;

        tracing::info!(member_id = inserted.id, "Created member");
        Ok(Member {
            id: inserted.id,
            email: inserted.email,
            password: inserted.password,
            roles: record.roles,
        })
    }

    async fn count(&self) -> MemberResult<u64> {
        Ok(member::Entity::find().count(&self.db).await?)
    }
}
