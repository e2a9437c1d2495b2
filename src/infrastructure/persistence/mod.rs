//! Link store implementations.
//!
//! - [`PgLinkRepository`] - PostgreSQL via SQLx; the production store
//! - [`MemoryLinkRepository`] - In-process store for development and tests

pub mod memory_link_repository;
pub mod pg_link_repository;

pub use memory_link_repository::MemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
