//! Storage adapters for the repository ports.
//!
//! PostgreSQL adapters use Diesel with async support through `diesel-async`
//! and `bb8` pooling. Repository implementations only translate between row
//! structs and domain types; business rules stay in the domain layer. Row
//! structs (`models.rs`) and table definitions (`schema.rs`) are internal
//! and never exposed outside this module.
//!
//! The in-memory adapters back the server when no database is configured
//! and the test suites.

mod diesel_content_repository;
mod diesel_user_repository;
pub mod memory;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_content_repository::DieselContentRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::run_pending_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
