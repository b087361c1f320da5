use std::sync::Arc;

use crate::error::{EventError, EventResult};
use crate::models::{Event, Page, PageRequest};
use crate::repository::EventRepository;
use crate::validation::{EventDto, validate_event};

/// Service layer for Event business logic
#[derive(Clone)]
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate the payload and store it as a draft
    pub async fn create_event(&self, input: EventDto) -> EventResult<Event> {
        let draft = validate_event(input).map_err(EventError::Validation)?;

        let event = self.repository.create(draft).await?;
        tracing::info!(event_id = event.id, free = event.free, offline = event.offline, "Created event");
        Ok(event)
    }

    /// Get an event by ID
    pub async fn get_event(&self, id: i32) -> EventResult<Event> {
        tracing::debug!(event_id = id, "Looking up event");
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(EventError::NotFound(id))
    }

    /// One page of events
    pub async fn list_events(&self, request: PageRequest) -> EventResult<Page<Event>> {
        self.repository.find_page(request).await
    }

    /// Replace the client fields of `current`, as returned by
    /// [`get_event`](Self::get_event).
    ///
    /// Writes without reading again. A row deleted in between still
    /// surfaces as [`EventError::NotFound`].
    pub async fn update_event(&self, current: Event, input: EventDto) -> EventResult<Event> {
        let draft = validate_event(input).map_err(EventError::Validation)?;
        let event = self.repository.update(current.id, draft).await?;

        tracing::info!(event_id = event.id, "Updated event");
        Ok(event)
    }
}
