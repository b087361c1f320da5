//! Events Domain
//!
//! Events are created as drafts, listed page by page, fetched and replaced.
//! Every representation is served as HAL (`application/hal+json`) with
//! links to the related operations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, binding errors, HAL assembly
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, derived fields
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← In-memory or PostgreSQL
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Event, EventStatus, paging
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_events::{EventLinks, EventService, InMemoryEventRepository, handlers};
//!
//! let service = EventService::new(InMemoryEventRepository::new());
//! let links = EventLinks::new("http://localhost:8080");
//!
//! // Mounted at /api/events by the application
//! let router = handlers::router(service, links);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod links;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod validation;

pub use error::{EventError, EventResult};
pub use links::EventLinks;
pub use models::{
    Direction, Event, EventDraft, EventSortField, EventStatus, Page, PageParams, PageRequest, Sort,
};
pub use postgres::PgEventRepository;
pub use repository::{EventRepository, InMemoryEventRepository};
pub use service::EventService;
pub use validation::{EventDto, Rejection, Violation, validate_event};
