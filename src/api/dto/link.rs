//! DTOs for link endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Request to shorten a URL.
///
/// The URL itself is checked by the service, which distinguishes
/// too-long URLs from invalid ones.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, message = "URL must not be empty"))]
    pub url: String,

    /// Requested short key length.
    #[validate(range(min = 3, max = 12, message = "Length must be between 3 and 12"))]
    pub len: usize,
}

/// Public view of a stored link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDto {
    pub short_key: String,
    pub original_url: String,
    pub click_count: i64,
}

impl From<Link> for LinkDto {
    fn from(link: Link) -> Self {
        Self {
            short_key: link.short_key,
            original_url: link.original_url,
            click_count: link.click_count,
        }
    }
}
