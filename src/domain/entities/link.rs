//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A stored mapping from a short key to an original URL.
///
/// `click_count` only grows, and only through the redirect path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub short_key: String,
    pub original_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        short_key: String,
        original_url: String,
        click_count: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            short_key,
            original_url,
            click_count,
            created_at,
        }
    }
}

/// Input data for creating a new link.
///
/// New links always start with a click count of zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub short_key: String,
    pub original_url: String,
}
