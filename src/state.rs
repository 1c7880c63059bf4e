//! Shared state injected into HTTP handlers.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::domain::repositories::LinkRepository;

/// Link service over whichever store the server was started with.
pub type SharedLinkService = Arc<LinkService<dyn LinkRepository>>;

#[derive(Clone)]
pub struct AppState {
    pub link_service: SharedLinkService,
}

impl AppState {
    pub fn new(link_service: SharedLinkService) -> Self {
        Self { link_service }
    }
}
