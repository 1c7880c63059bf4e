//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable mapping of short keys to links.
///
/// Reads observe every write made earlier in the same process. Uniqueness of
/// both `short_key` and `original_url` is enforced by the store itself, so
/// that concurrent writers are arbitrated here and not by callers.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by its short key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn find_by_short_key(&self, short_key: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by its original URL.
    ///
    /// Used to reuse the existing link when a URL is submitted again.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<Link>, AppError>;

    /// Returns true if a link with this short key exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn exists_by_short_key(&self, short_key: &str) -> Result<bool, AppError>;

    /// Persists a new link with a click count of zero.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] wrapping
    /// [`crate::error::StoreError::UniqueViolation`] if the short key or the
    /// original URL is already stored, and other storage errors on failure.
    async fn save(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Atomically adds one to the click count of a link.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` with the updated count
    /// - `Ok(None)` if no link has this short key
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn increment_click_count(&self, short_key: &str) -> Result<Option<Link>, AppError>;

    /// Counts stored links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
