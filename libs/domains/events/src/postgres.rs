use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait, Order,
    PaginatorTrait, QueryOrder,
};

use crate::{
    entity,
    error::{EventError, EventResult},
    models::{Direction, Event, EventDraft, EventSortField, Page, PageRequest},
    repository::EventRepository,
};

#[derive(Clone)]
pub struct PgEventRepository {
    db: DatabaseConnection,
}

impl PgEventRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn sort_column(field: EventSortField) -> entity::Column {
    match field {
        EventSortField::Id => entity::Column::Id,
        EventSortField::Name => entity::Column::Name,
        EventSortField::Description => entity::Column::Description,
        EventSortField::Location => entity::Column::Location,
        EventSortField::BeginEnrollmentDateTime => entity::Column::BeginEnrollmentDateTime,
        EventSortField::CloseEnrollmentDateTime => entity::Column::CloseEnrollmentDateTime,
        EventSortField::BeginEventDateTime => entity::Column::BeginEventDateTime,
        EventSortField::EndEventDateTime => entity::Column::EndEventDateTime,
        EventSortField::BasePrice => entity::Column::BasePrice,
        EventSortField::MaxPrice => entity::Column::MaxPrice,
        EventSortField::LimitOfEnrollment => entity::Column::LimitOfEnrollment,
        EventSortField::EventStatus => entity::Column::EventStatus,
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn create(&self, draft: EventDraft) -> EventResult<Event> {
        let active_model: entity::ActiveModel = draft.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(event_id = model.id, "Inserted event");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> EventResult<Option<Event>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn find_page(&self, request: PageRequest) -> EventResult<Page<Event>> {
        let order = match request.sort.direction {
            Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        };

        let mut query =
            entity::Entity::find().order_by(sort_column(request.sort.field), order);
        if request.sort.field != EventSortField::Id {
            query = query.order_by_asc(entity::Column::Id);
        }

        let paginator = query.paginate(&self.db, request.size);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(request.page).await?;

        Ok(Page {
            items: models.into_iter().map(Into::into).collect(),
            total,
            request,
        })
    }

    async fn update(&self, id: i32, draft: EventDraft) -> EventResult<Event> {
        let mut active_model = entity::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        active_model.apply_draft(draft);

        let updated = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => EventError::NotFound(id),
            other => EventError::Database(other),
        })?;

        tracing::info!(event_id = id, "Updated event");
        Ok(updated.into())
    }

    async fn count(&self) -> EventResult<u64> {
        Ok(entity::Entity::find().count(&self.db).await?)
    }
}
