//! HAL (`application/hal+json`) representation models.
//!
//! Resources carry their hypermedia under `_links`, keyed by relation name:
//!
//! ```json
//! {
//!   "id": 1,
//!   "name": "Spring",
//!   "_links": {
//!     "self": { "href": "http://localhost:8080/api/events/1" },
//!     "profile": { "href": "http://localhost:8080/swagger-ui/#/events/get_event" }
//!   }
//! }
//! ```
//!
//! Collections are wrapped in a [`PagedModel`] that nests the items under
//! `_embedded.<rel>` and adds a `page` block.

use axum::{
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde::{
    Serialize, Serializer,
    ser::{SerializeMap, SerializeStruct},
};
use utoipa::ToSchema;

use crate::errors::AppError;

pub const HAL_JSON: &str = "application/hal+json";

/// Common relation names.
pub mod rel {
    pub const SELF: &str = "self";
    pub const PROFILE: &str = "profile";
    pub const FIRST: &str = "first";
    pub const PREV: &str = "prev";
    pub const NEXT: &str = "next";
    pub const LAST: &str = "last";
    pub const INDEX: &str = "index";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Link {
    pub href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// Relation-to-link map that keeps insertion order. Adding a relation a
/// second time replaces the earlier link in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links(Vec<(String, Link)>);

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rel: impl Into<String>, href: impl Into<String>) -> Self {
        self.push(rel, href);
        self
    }

    pub fn push(&mut self, rel: impl Into<String>, href: impl Into<String>) {
        let rel = rel.into();
        let link = Link::new(href);
        match self.0.iter_mut().find(|(r, _)| *r == rel) {
            Some(slot) => slot.1 = link,
            None => self.0.push((rel, link)),
        }
    }

    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.0.iter().find(|(r, _)| r == rel).map(|(_, l)| l)
    }

    pub fn rels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(r, _)| r.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Links {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (rel, link) in &self.0 {
            map.serialize_entry(rel, link)?;
        }
        map.end()
    }
}

/// A document that is nothing but links, e.g. an API root.
#[derive(Debug, Clone, Serialize)]
pub struct RepresentationModel {
    #[serde(rename = "_links")]
    pub links: Links,
}

impl RepresentationModel {
    pub fn new(links: Links) -> Self {
        Self { links }
    }
}

/// A single resource with its fields flattened next to `_links`.
#[derive(Debug, Clone, Serialize)]
pub struct EntityModel<T> {
    #[serde(flatten)]
    pub content: T,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl<T> EntityModel<T> {
    pub fn new(content: T, links: Links) -> Self {
        Self { content, links }
    }
}

/// Paging block of a [`PagedModel`]. `number` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number: u64,
}

impl PageMetadata {
    pub fn new(size: u64, number: u64, total_elements: u64) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            total_elements.div_ceil(size)
        };

        Self {
            size,
            total_elements,
            total_pages,
            number,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0 && self.total_pages > 0
    }

    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }

    /// Index of the last page, `None` when there are no pages at all.
    pub fn last_page(&self) -> Option<u64> {
        self.total_pages.checked_sub(1)
    }
}

/// A page of resources.
///
/// Serialized as `{ "_embedded": { <rel>: [...] }, "_links": ..., "page": ... }`.
/// `_embedded` is left out entirely when the page holds no items.
#[derive(Debug, Clone)]
pub struct PagedModel<T> {
    pub rel: String,
    pub items: Vec<EntityModel<T>>,
    pub links: Links,
    pub page: PageMetadata,
}

impl<T> PagedModel<T> {
    pub fn new(
        rel: impl Into<String>,
        items: Vec<EntityModel<T>>,
        links: Links,
        page: PageMetadata,
    ) -> Self {
        Self {
            rel: rel.into(),
            items,
            links,
            page,
        }
    }
}

struct Embedded<'a, T> {
    rel: &'a str,
    items: &'a [EntityModel<T>],
}

impl<T: Serialize> Serialize for Embedded<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.rel, self.items)?;
        map.end()
    }
}

impl<T: Serialize> Serialize for PagedModel<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.items.is_empty() { 2 } else { 3 };
        let mut state = serializer.serialize_struct("PagedModel", fields)?;
        if self.items.is_empty() {
            state.skip_field("_embedded")?;
        } else {
            state.serialize_field(
                "_embedded",
                &Embedded {
                    rel: &self.rel,
                    items: &self.items,
                },
            )?;
        }
        state.serialize_field("_links", &self.links)?;
        state.serialize_field("page", &self.page)?;
        state.end()
    }
}

/// Responds with `Content-Type: application/hal+json`.
///
/// ```ignore
/// async fn root() -> Hal<RepresentationModel> {
///     Hal(RepresentationModel::new(Links::new().with("events", "/api/events")))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Hal<T>(pub T);

impl<T: Serialize> IntoResponse for Hal<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => (
                [(header::CONTENT_TYPE, HeaderValue::from_static(HAL_JSON))],
                bytes,
            )
                .into_response(),
            Err(e) => AppError::SerdeJson(e).into_response(),
        }
    }
}
