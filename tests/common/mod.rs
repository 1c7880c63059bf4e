#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use link_shorter::application::services::LinkService;
use link_shorter::domain::entities::{Link, NewLink};
use link_shorter::domain::repositories::LinkRepository;
use link_shorter::error::{AppError, StoreError};
use link_shorter::infrastructure::persistence::InMemoryLinkRepository;
use link_shorter::routes::{app, app_router};
use link_shorter::state::AppState;
use link_shorter::utils::key_codec::KeyCodec;
use std::sync::Arc;
use tower_http::normalize_path::NormalizePath;

pub fn create_test_state(repo: Arc<dyn LinkRepository>) -> AppState {
    let link_service = Arc::new(LinkService::new(repo, KeyCodec::default()));
    AppState::new(link_service)
}

/// Full application router over a fresh in-memory store.
pub fn create_test_app() -> (Router, Arc<InMemoryLinkRepository>) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let state = create_test_state(repo.clone());
    (app_router(state), repo)
}

/// Application service as served, with trailing slash trimming.
pub fn create_test_service() -> (NormalizePath<Router>, Arc<InMemoryLinkRepository>) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let state = create_test_state(repo.clone());
    (app(state), repo)
}

pub async fn create_test_link(repo: &InMemoryLinkRepository, short_key: &str, url: &str) -> Link {
    repo.save(NewLink {
        short_key: short_key.to_string(),
        original_url: url.to_string(),
    })
    .await
    .unwrap()
}

/// Store whose every call fails, for error-path tests.
pub struct FailingLinkRepository;

fn unavailable() -> AppError {
    StoreError::Database("connection refused".to_string()).into()
}

#[async_trait]
impl LinkRepository for FailingLinkRepository {
    async fn find_by_short_key(&self, _short_key: &str) -> Result<Option<Link>, AppError> {
        Err(unavailable())
    }

    async fn find_by_original_url(&self, _original_url: &str) -> Result<Option<Link>, AppError> {
        Err(unavailable())
    }

    async fn exists_by_short_key(&self, _short_key: &str) -> Result<bool, AppError> {
        Err(unavailable())
    }

    async fn save(&self, _new_link: NewLink) -> Result<Link, AppError> {
        Err(unavailable())
    }

    async fn increment_click_count(&self, _short_key: &str) -> Result<Option<Link>, AppError> {
        Err(unavailable())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Err(unavailable())
    }
}
