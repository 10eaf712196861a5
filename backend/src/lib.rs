//! User directory backend library modules.
//!
//! The crate follows a ports-and-adapters layout: `domain` holds the entity,
//! validation rules, error payload, and repository port; `inbound::http`
//! adapts HTTP requests onto the domain; `outbound::persistence` implements
//! the port against PostgreSQL via Diesel; `server` wires the pieces into an
//! actix-web application.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::Trace;
