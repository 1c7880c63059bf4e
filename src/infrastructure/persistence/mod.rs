//! Repository implementations.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage in PostgreSQL via SQLx
//! - [`InMemoryLinkRepository`] - Link storage in process memory

pub mod memory_link_repository;
pub mod pg_link_repository;

pub use memory_link_repository::InMemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
