//! Link assembly for event representations.
//!
//! Links are a plain function of the event (or page) and the public base
//! URL, so handlers and tests build identical hrefs.

use axum_helpers::{EntityModel, Links, PageMetadata, PagedModel, hal::rel};

use crate::models::{Event, Page, PageRequest};

/// `_embedded` key of event pages.
pub const EVENT_LIST_REL: &str = "eventList";
pub const QUERY_EVENTS_REL: &str = "query-events";
pub const UPDATE_EVENT_REL: &str = "update-event";
pub const EVENTS_REL: &str = "events";

/// Operation ids in the OpenAPI document, the targets of `profile` links.
pub mod operation {
    pub const CREATE_EVENT: &str = "create_event";
    pub const QUERY_EVENTS: &str = "query_events";
    pub const GET_EVENT: &str = "get_event";
    pub const UPDATE_EVENT: &str = "update_event";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLinks {
    base_url: String,
}

impl EventLinks {
    /// `base_url` is the public origin, e.g. `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn api_root(&self) -> String {
        format!("{}/api", self.base_url)
    }

    pub fn events(&self) -> String {
        format!("{}/api/events", self.base_url)
    }

    pub fn event(&self, id: i32) -> String {
        format!("{}/{}", self.events(), id)
    }

    pub fn profile(&self, operation: &str) -> String {
        format!("{}/swagger-ui/#/events/{}", self.base_url, operation)
    }

    fn page_href(&self, request: &PageRequest) -> String {
        format!(
            "{}?page={}&size={}&sort={}",
            self.events(),
            request.page,
            request.size,
            request.sort
        )
    }

    /// Links of a freshly created event.
    pub fn created(&self, event: &Event) -> Links {
        let href = self.event(event.id);
        Links::new()
            .with(rel::SELF, href.clone())
            .with(QUERY_EVENTS_REL, self.events())
            .with(UPDATE_EVENT_REL, href)
            .with(rel::PROFILE, self.profile(operation::CREATE_EVENT))
    }

    /// `self` plus the profile of `operation`.
    pub fn single(&self, event: &Event, operation: &str) -> Links {
        Links::new()
            .with(rel::SELF, self.event(event.id))
            .with(rel::PROFILE, self.profile(operation))
    }

    /// Links of an event embedded in a page.
    pub fn item(&self, event: &Event) -> Links {
        Links::new().with(rel::SELF, self.event(event.id))
    }

    /// Navigation links of a page: `first`, `prev`, `self`, `next`, `last`
    /// and `profile`. `first` and `last` need at least one page; `prev` and
    /// `next` only appear when such a page exists.
    pub fn page(&self, request: &PageRequest, metadata: &PageMetadata) -> Links {
        let mut links = Links::new();

        if let Some(last) = metadata.last_page() {
            links.push(rel::FIRST, self.page_href(&request.with_page(0)));
            if metadata.has_previous() {
                let prev = request.page.saturating_sub(1).min(last);
                links.push(rel::PREV, self.page_href(&request.with_page(prev)));
            }
            links.push(rel::SELF, self.page_href(request));
            if metadata.has_next() {
                links.push(rel::NEXT, self.page_href(&request.with_page(request.page + 1)));
            }
            links.push(rel::LAST, self.page_href(&request.with_page(last)));
        } else {
            links.push(rel::SELF, self.page_href(request));
        }

        links.with(rel::PROFILE, self.profile(operation::QUERY_EVENTS))
    }

    /// Links of the API root document.
    pub fn root(&self) -> Links {
        Links::new().with(EVENTS_REL, self.events())
    }

    /// Link attached to 400 responses.
    pub fn index(&self) -> Links {
        Links::new().with(rel::INDEX, self.api_root())
    }

    pub fn paged(&self, page: Page<Event>) -> PagedModel<Event> {
        let metadata = page.metadata();
        let links = self.page(&page.request, &metadata);
        let items = page
            .items
            .into_iter()
            .map(|event| {
                let links = self.item(&event);
                EntityModel::new(event, links)
            })
            .collect();

        PagedModel::new(EVENT_LIST_REL, items, links, metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, EventSortField, Sort};

    fn links() -> EventLinks {
        EventLinks::new("http://localhost:8080/")
    }

    fn request(page: u64) -> PageRequest {
        PageRequest::new(page, 10, Sort::new(EventSortField::Name, Direction::Desc))
    }

    #[test]
    fn test_hrefs() {
        let links = links();
        assert_eq!(links.api_root(), "http://localhost:8080/api");
        assert_eq!(links.event(3), "http://localhost:8080/api/events/3");
        assert_eq!(
            links.profile(operation::CREATE_EVENT),
            "http://localhost:8080/swagger-ui/#/events/create_event"
        );
    }

    #[test]
    fn test_middle_page_has_all_navigation() {
        let metadata = PageMetadata::new(10, 1, 30);
        let page_links = links().page(&request(1), &metadata);

        assert_eq!(
            page_links.rels().collect::<Vec<_>>(),
            vec!["first", "prev", "self", "next", "last", "profile"]
        );
        assert_eq!(
            page_links.get("next").unwrap().href,
            "http://localhost:8080/api/events?page=2&size=10&sort=name,DESC"
        );
        assert_eq!(
            page_links.get("last").unwrap().href,
            "http://localhost:8080/api/events?page=2&size=10&sort=name,DESC"
        );
    }

    #[test]
    fn test_first_page_has_no_prev() {
        let metadata = PageMetadata::new(10, 0, 30);
        let page_links = links().page(&request(0), &metadata);

        assert!(page_links.get("prev").is_none());
        assert!(page_links.get("next").is_some());
        assert!(page_links.get("first").is_some());
    }

    #[test]
    fn test_empty_listing_has_only_self_and_profile() {
        let metadata = PageMetadata::new(10, 0, 0);
        let page_links = links().page(&request(0), &metadata);

        assert_eq!(
            page_links.rels().collect::<Vec<_>>(),
            vec!["self", "profile"]
        );
    }

    #[test]
    fn test_page_beyond_last_points_prev_at_last() {
        let metadata = PageMetadata::new(10, 7, 30);
        let page_links = links().page(&request(7), &metadata);

        assert!(page_links.get("next").is_none());
        assert_eq!(
            page_links.get("prev").unwrap().href,
            "http://localhost:8080/api/events?page=2&size=10&sort=name,DESC"
        );
    }

    #[test]
    fn test_root_and_index() {
        assert_eq!(
            links().root().get("events").unwrap().href,
            "http://localhost:8080/api/events"
        );
        assert_eq!(
            links().index().get("index").unwrap().href,
            "http://localhost:8080/api"
        );
    }
}
