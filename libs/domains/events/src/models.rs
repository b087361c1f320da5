use axum_helpers::PageMetadata;
use chrono::NaiveDateTime;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};

use crate::error::EventError;

/// Location value that marks an event as online.
pub const NO_LOCATION: &str = "no location";

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;
/// Largest page index a listing accepts; higher indexes are clamped to it.
pub const MAX_PAGE_INDEX: u64 = i32::MAX as u64;

/// Publishing state of an event. New events are drafts; no endpoint
/// advances the status.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "event_status")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "PUBLISHED")]
    Published,
    #[sea_orm(string_value = "CLOSED_ENROLLMENT")]
    ClosedEnrollment,
    #[sea_orm(string_value = "BEGAN_EVENT")]
    BeganEvent,
    #[sea_orm(string_value = "ENDED_EVENT")]
    EndedEvent,
}

/// A stored event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "2023-11-16T00:00:00")]
    pub begin_enrollment_date_time: NaiveDateTime,
    #[schema(value_type = String, example = "2023-11-16T23:59:00")]
    pub close_enrollment_date_time: NaiveDateTime,
    #[schema(value_type = String, example = "2023-11-17T23:59:00")]
    pub begin_event_date_time: NaiveDateTime,
    #[schema(value_type = String, example = "2023-11-18T23:59:00")]
    pub end_event_date_time: NaiveDateTime,
    pub location: String,
    pub base_price: i32,
    pub max_price: i32,
    pub limit_of_enrollment: i32,
    /// Derived: both prices are zero
    pub free: bool,
    /// Derived: the event has a physical location
    pub offline: bool,
    pub event_status: EventStatus,
}

impl Event {
    pub fn from_draft(id: i32, draft: EventDraft, event_status: EventStatus) -> Self {
        let free = draft.is_free();
        let offline = draft.is_offline();

        Self {
            id,
            name: draft.name,
            description: draft.description,
            begin_enrollment_date_time: draft.begin_enrollment_date_time,
            close_enrollment_date_time: draft.close_enrollment_date_time,
            begin_event_date_time: draft.begin_event_date_time,
            end_event_date_time: draft.end_event_date_time,
            location: draft.location,
            base_price: draft.base_price,
            max_price: draft.max_price,
            limit_of_enrollment: draft.limit_of_enrollment,
            free,
            offline,
            event_status,
        }
    }

    /// Replace every client field, keeping `id` and `event_status`.
    pub fn replace(self, draft: EventDraft) -> Self {
        Self::from_draft(self.id, draft, self.event_status)
    }
}

/// The client-supplied part of an event, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub description: String,
    pub begin_enrollment_date_time: NaiveDateTime,
    pub close_enrollment_date_time: NaiveDateTime,
    pub begin_event_date_time: NaiveDateTime,
    pub end_event_date_time: NaiveDateTime,
    pub location: String,
    pub base_price: i32,
    pub max_price: i32,
    pub limit_of_enrollment: i32,
}

impl EventDraft {
    pub fn is_free(&self) -> bool {
        self.base_price == 0 && self.max_price == 0
    }

    pub fn is_offline(&self) -> bool {
        let location = self.location.trim();
        !location.is_empty() && !location.eq_ignore_ascii_case(NO_LOCATION)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Fields the event listing can be ordered by, named as in the JSON body.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum EventSortField {
    #[default]
    Id,
    Name,
    Description,
    Location,
    BeginEnrollmentDateTime,
    CloseEnrollmentDateTime,
    BeginEventDateTime,
    EndEventDateTime,
    BasePrice,
    MaxPrice,
    LimitOfEnrollment,
    EventStatus,
}

impl EventSortField {
    /// Ascending comparison of two events on this field alone.
    pub fn compare(&self, a: &Event, b: &Event) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Name => a.name.cmp(&b.name),
            Self::Description => a.description.cmp(&b.description),
            Self::Location => a.location.cmp(&b.location),
            Self::BeginEnrollmentDateTime => a
                .begin_enrollment_date_time
                .cmp(&b.begin_enrollment_date_time),
            Self::CloseEnrollmentDateTime => a
                .close_enrollment_date_time
                .cmp(&b.close_enrollment_date_time),
            Self::BeginEventDateTime => a.begin_event_date_time.cmp(&b.begin_event_date_time),
            Self::EndEventDateTime => a.end_event_date_time.cmp(&b.end_event_date_time),
            Self::BasePrice => a.base_price.cmp(&b.base_price),
            Self::MaxPrice => a.max_price.cmp(&b.max_price),
            Self::LimitOfEnrollment => a.limit_of_enrollment.cmp(&b.limit_of_enrollment),
            Self::EventStatus => a.event_status.cmp(&b.event_status),
        }
    }
}

/// `<field>[,ASC|DESC]`, e.g. `name,DESC`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort {
    pub field: EventSortField,
    pub direction: Direction,
}

impl Sort {
    pub fn new(field: EventSortField, direction: Direction) -> Self {
        Self { field, direction }
    }

    /// Total order: the sort field, then `id` ascending.
    pub fn compare(&self, a: &Event, b: &Event) -> Ordering {
        let primary = match self.direction {
            Direction::Asc => self.field.compare(a, b),
            Direction::Desc => self.field.compare(b, a),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.field, self.direction)
    }
}

impl FromStr for Sort {
    type Err = EventError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || EventError::InvalidSort(raw.to_string());

        let mut parts = raw.split(',').map(str::trim);
        let field = parts
            .next()
            .filter(|f| !f.is_empty())
            .ok_or_else(invalid)?
            .parse::<EventSortField>()
            .map_err(|_| invalid())?;
        let direction = match parts.next() {
            None | Some("") => Direction::Asc,
            Some(d) => d.parse::<Direction>().map_err(|_| invalid())?,
        };

        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self { field, direction })
    }
}

/// Query string of the event listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Zero-based page index, default 0
    pub page: Option<i64>,
    /// Page size, default 20, at most 100
    pub size: Option<i64>,
    /// `<field>[,ASC|DESC]`, default `id,ASC`
    #[param(example = "name,DESC")]
    pub sort: Option<String>,
}

impl PageParams {
    /// Applies defaults and bounds. Only an unknown sort is an error.
    pub fn into_request(self) -> Result<PageRequest, EventError> {
        let page = (self.page.unwrap_or(0).max(0) as u64).min(MAX_PAGE_INDEX);
        let size = self
            .size
            .map_or(DEFAULT_PAGE_SIZE, |s| s.clamp(1, MAX_PAGE_SIZE as i64) as u64);
        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") => Sort::default(),
            Some(raw) => raw.parse()?,
        };

        Ok(PageRequest { page, size, sort })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: Sort,
}

impl PageRequest {
    pub fn new(page: u64, size: u64, sort: Sort) -> Self {
        Self { page, size, sort }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    pub fn with_page(self, page: u64) -> Self {
        Self { page, ..self }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE, Sort::default())
    }
}

/// One page of a sorted listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn metadata(&self) -> PageMetadata {
        PageMetadata::new(self.request.size, self.request.page, self.total)
    }
}
