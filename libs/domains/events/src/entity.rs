use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{Event, EventDraft, EventStatus};

/// Sea-ORM Entity for the events table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub begin_enrollment_date_time: DateTime,
    pub close_enrollment_date_time: DateTime,
    pub begin_event_date_time: DateTime,
    pub end_event_date_time: DateTime,
    pub location: String,
    pub base_price: i32,
    pub max_price: i32,
    pub limit_of_enrollment: i32,
    pub free: bool,
    pub offline: bool,
    pub event_status: EventStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Event {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            begin_enrollment_date_time: model.begin_enrollment_date_time,
            close_enrollment_date_time: model.close_enrollment_date_time,
            begin_event_date_time: model.begin_event_date_time,
            end_event_date_time: model.end_event_date_time,
            location: model.location,
            base_price: model.base_price,
            max_price: model.max_price,
            limit_of_enrollment: model.limit_of_enrollment,
            free: model.free,
            offline: model.offline,
            event_status: model.event_status,
        }
    }
}

impl ActiveModel {
    /// Sets every client field and recomputes `free` and `offline`.
    /// `id` and `event_status` are left untouched.
    pub fn apply_draft(&mut self, draft: EventDraft) {
        self.free = Set(draft.is_free());
        self.offline = Set(draft.is_offline());
        self.name = Set(draft.name);
        self.description = Set(draft.description);
        self.begin_enrollment_date_time = Set(draft.begin_enrollment_date_time);
        self.close_enrollment_date_time = Set(draft.close_enrollment_date_time);
        self.begin_event_date_time = Set(draft.begin_event_date_time);
        self.end_event_date_time = Set(draft.end_event_date_time);
        self.location = Set(draft.location);
        self.base_price = Set(draft.base_price);
        self.max_price = Set(draft.max_price);
        self.limit_of_enrollment = Set(draft.limit_of_enrollment);
    }
}

impl From<EventDraft> for ActiveModel {
    fn from(draft: EventDraft) -> Self {
        let mut model = ActiveModel {
            event_status: Set(EventStatus::Draft),
            ..Default::default()
        };
        model.apply_draft(draft);
        model
    }
}
