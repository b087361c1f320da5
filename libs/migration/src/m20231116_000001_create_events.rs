use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

const STATUSES: [EventStatus; 5] = [
    EventStatus::Draft,
    EventStatus::Published,
    EventStatus::ClosedEnrollment,
    EventStatus::BeganEvent,
    EventStatus::EndedEvent,
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(EventStatus::Enum)
                    .values(STATUSES)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(pk_auto(Events::Id))
                    .col(string(Events::Name))
                    .col(text(Events::Description))
                    .col(date_time(Events::BeginEnrollmentDateTime))
                    .col(date_time(Events::CloseEnrollmentDateTime))
                    .col(date_time(Events::BeginEventDateTime))
                    .col(date_time(Events::EndEventDateTime))
                    .col(string(Events::Location))
                    .col(integer(Events::BasePrice))
                    .col(integer(Events::MaxPrice))
                    .col(integer(Events::LimitOfEnrollment))
                    .col(boolean(Events::Free).default(false))
                    .col(boolean(Events::Offline).default(false))
                    .col(
                        ColumnDef::new(Events::EventStatus)
                            .enumeration(EventStatus::Enum, STATUSES)
                            .not_null()
                            .default("DRAFT"),
                    )
                    .check(Expr::col(Events::BasePrice).gte(0))
                    .check(Expr::col(Events::MaxPrice).gte(0))
                    .check(Expr::col(Events::LimitOfEnrollment).gte(0))
                    .to_owned(),
            )
            .await?;

        // Sort keys used by the paged listing
        manager
            .create_index(
                Index::create()
                    .name("idx_events_name")
                    .table(Events::Table)
                    .col(Events::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_begin_event_date_time")
                    .table(Events::Table)
                    .col(Events::BeginEventDateTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(EventStatus::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Name,
    Description,
    BeginEnrollmentDateTime,
    CloseEnrollmentDateTime,
    BeginEventDateTime,
    EndEventDateTime,
    Location,
    BasePrice,
    MaxPrice,
    LimitOfEnrollment,
    Free,
    Offline,
    EventStatus,
}

#[derive(DeriveIden, Clone, Copy)]
enum EventStatus {
    #[sea_orm(iden = "event_status")]
    Enum,
    #[sea_orm(iden = "DRAFT")]
    Draft,
    #[sea_orm(iden = "PUBLISHED")]
    Published,
    #[sea_orm(iden = "CLOSED_ENROLLMENT")]
    ClosedEnrollment,
    #[sea_orm(iden = "BEGAN_EVENT")]
    BeganEvent,
    #[sea_orm(iden = "ENDED_EVENT")]
    EndedEvent,
}
