use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{EventError, EventResult};
use crate::models::{Event, EventDraft, EventStatus, Page, PageRequest};

/// Repository trait for Event persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Store a new draft event and assign its id
    async fn create(&self, draft: EventDraft) -> EventResult<Event>;

    /// Get an event by ID
    async fn get_by_id(&self, id: i32) -> EventResult<Option<Event>>;

    /// One page of events in the requested order
    async fn find_page(&self, request: PageRequest) -> EventResult<Page<Event>>;

    /// Replace the client fields of an existing event
    async fn update(&self, id: i32, draft: EventDraft) -> EventResult<Event>;

    /// Number of stored events
    async fn count(&self) -> EventResult<u64>;
}

#[derive(Debug, Default)]
struct Store {
    next_id: i32,
    events: HashMap<i32, Event>,
}

/// In-memory implementation of EventRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, draft: EventDraft) -> EventResult<Event> {
        let mut store = self.store.write().await;

        store.next_id += 1;
        let event = Event::from_draft(store.next_id, draft, EventStatus::Draft);
        store.events.insert(event.id, event.clone());

        Ok(event)
    }

    async fn get_by_id(&self, id: i32) -> EventResult<Option<Event>> {
        let store = self.store.read().await;
        Ok(store.events.get(&id).cloned())
    }

    async fn find_page(&self, request: PageRequest) -> EventResult<Page<Event>> {
        let store = self.store.read().await;

        let mut events: Vec<&Event> = store.events.values().collect();
        events.sort_by(|a, b| request.sort.compare(a, b));

        let items = events
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.size as usize)
            .cloned()
            .collect();

        Ok(Page {
            items,
            total: store.events.len() as u64,
            request,
        })
    }

    async fn update(&self, id: i32, draft: EventDraft) -> EventResult<Event> {
        let mut store = self.store.write().await;

        let current = store.events.remove(&id).ok_or(EventError::NotFound(id))?;
        let updated = current.replace(draft);
        store.events.insert(id, updated.clone());

        Ok(updated)
    }

    async fn count(&self) -> EventResult<u64> {
        Ok(self.store.read().await.events.len() as u64)
    }
}
