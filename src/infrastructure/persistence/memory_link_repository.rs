//! Process-local implementation of link repository.
//!
//! Keeps the same uniqueness and atomicity guarantees as the PostgreSQL
//! repository. Used by the HTTP tests and suitable for single-instance runs
//! where durability across restarts is not needed.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, StoreError, UniqueConstraint};

#[derive(Default)]
struct Tables {
    next_id: i64,
    by_key: HashMap<String, Link>,
    /// original_url -> short_key
    by_url: HashMap<String, String>,
}

/// In-memory link repository guarded by a single read-write lock.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    tables: RwLock<Tables>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find_by_short_key(&self, short_key: &str) -> Result<Option<Link>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.by_key.get(short_key).cloned())
    }

    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<Link>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .by_url
            .get(original_url)
            .and_then(|key| tables.by_key.get(key))
            .cloned())
    }

    async fn exists_by_short_key(&self, short_key: &str) -> Result<bool, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.by_key.contains_key(short_key))
    }

    async fn save(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut tables = self.tables.write().await;

        if tables.by_key.contains_key(&new_link.short_key) {
            return Err(StoreError::UniqueViolation(UniqueConstraint::ShortKey).into());
        }
        if tables.by_url.contains_key(&new_link.original_url) {
            return Err(StoreError::UniqueViolation(UniqueConstraint::OriginalUrl).into());
        }

        tables.next_id += 1;
        let link = Link::new(
            tables.next_id,
            new_link.short_key,
            new_link.original_url,
            0,
            Utc::now(),
        );

        tables
            .by_url
            .insert(link.original_url.clone(), link.short_key.clone());
        tables.by_key.insert(link.short_key.clone(), link.clone());

        Ok(link)
    }

    async fn increment_click_count(&self, short_key: &str) -> Result<Option<Link>, AppError> {
        let mut tables = self.tables.write().await;

        Ok(tables.by_key.get_mut(short_key).map(|link| {
            link.click_count += 1;
            link.clone()
        }))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.by_key.len() as i64)
    }
}
