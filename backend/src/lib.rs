//! Blog backend library modules.
//!
//! Layered hexagonally: `domain` holds entities, use-case services, and
//! ports; `inbound` adapts HTTP onto the domain; `outbound` implements the
//! driven ports over PostgreSQL and SMTP; `server` wires the layers into a
//! running Actix application.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::RequestLog;
