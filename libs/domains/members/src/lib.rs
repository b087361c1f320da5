//! Members Domain
//!
//! Members are the login identities of the API. They are seeded at start-up
//! and resolved to a [`Principal`] when a request carries
//! `Authorization: Basic` credentials.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │  Middleware  │  ← Basic credentials → Principal in request extensions
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │   Service    │  ← Principal lookup, password checks, seeding
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │  Repository  │  ← In-memory or PostgreSQL (members + member_roles)
//! └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_members::{BasicAuth, InMemoryMemberRepository, MemberService};
//!
//! let service = MemberService::new(InMemoryMemberRepository::new());
//! let auth = BasicAuth::new(service, false);
//! // router.layer(axum::middleware::from_fn_with_state(auth, domain_members::basic_auth));
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod models;
pub mod password;
pub mod postgres;
pub mod repository;
pub mod service;

pub use config::{AuthConfig, SeedMember};
pub use error::{MemberError, MemberResult};
pub use middleware::{BasicAuth, basic_auth};
pub use models::{Member, MemberRole, NewMember, Principal};
pub use postgres::PgMemberRepository;
pub use repository::{InMemoryMemberRepository, MemberRepository};
pub use service::MemberService;
