use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(MemberRole::Enum)
                    .values([MemberRole::Admin, MemberRole::User])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(pk_auto(Members::Id))
                    .col(string(Members::Email))
                    .col(string(Members::Password))
                    .col(
                        timestamp_with_time_zone(Members::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Logins compare emails case-insensitively
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_members_email_lower ON members (LOWER(email))",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MemberRoles::Table)
                    .if_not_exists()
                    .col(integer(MemberRoles::MemberId))
                    .col(
                        ColumnDef::new(MemberRoles::Role)
                            .enumeration(MemberRole::Enum, [MemberRole::Admin, MemberRole::User])
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(MemberRoles::MemberId)
                            .col(MemberRoles::Role),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_roles_member_id")
                            .from(MemberRoles::Table, MemberRoles::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MemberRoles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(MemberRole::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Members {
    Table,
    Id,
    Email,
    Password,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MemberRoles {
    Table,
    MemberId,
    Role,
}

#[derive(DeriveIden)]
enum MemberRole {
    #[sea_orm(iden = "member_role")]
    Enum,
    #[sea_orm(iden = "ADMIN")]
    Admin,
    #[sea_orm(iden = "USER")]
    User,
}
