//! Link creation, lookup and redirect counting.

use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, StoreError, UniqueConstraint};
use crate::utils::key_codec::KeyCodec;
use crate::utils::link_url::validate_original_url;
use serde_json::json;
use tracing::{debug, error, info, warn};

/// Shortest short key a client may request.
pub const MIN_KEY_LENGTH: usize = 3;

/// Longest short key a client may request.
pub const MAX_KEY_LENGTH: usize = 12;

/// Number of salted candidates tried before settling for the last one.
const MAX_ATTEMPTS: u32 = 10;

/// Keys shadowed by fixed routes; a link stored under one could not be
/// redirected.
const RESERVED_KEYS: &[&str] = &["health"];

/// Returns true if `short_key` collides with a fixed route.
pub fn is_reserved_key(short_key: &str) -> bool {
    RESERVED_KEYS.contains(&short_key)
}

/// Service for creating and resolving shortened links.
///
/// Keys are derived deterministically from the URL, so resubmitting a URL
/// returns the link created the first time.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    key_codec: KeyCodec,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>, key_codec: KeyCodec) -> Self {
        Self {
            link_repository,
            key_codec,
        }
    }

    /// Creates a short link of `length` symbols for `original_url`.
    ///
    /// # Deduplication
    ///
    /// If the URL is already stored, the existing link is returned unchanged,
    /// whatever `length` is requested. When a concurrent request stores the
    /// same URL first, its link is returned.
    ///
    /// # Key Generation
    ///
    /// Tries up to 10 salted candidates and keeps the first one not yet
    /// stored. If every candidate is taken, the last one is used and the store
    /// has the final say.
    ///
    /// # Errors
    ///
    /// - [`AppError::LinkTooLong`] if the URL exceeds 128 characters
    /// - [`AppError::LinkInvalid`] if the URL has no dot or is too short
    /// - [`AppError::Validation`] if `length` is outside 3..=12
    /// - [`AppError::Storage`] on store failures
    pub async fn create_short_link(
        &self,
        original_url: &str,
        length: usize,
    ) -> Result<Link, AppError> {
        info!("Creating short link for URL: {}, length: {}", original_url, length);

        if let Err(e) = validate_original_url(original_url) {
            warn!("Rejected URL {}: {}", original_url, e);
            return Err(e);
        }

        if !(MIN_KEY_LENGTH..=MAX_KEY_LENGTH).contains(&length) {
            return Err(AppError::bad_request(
                format!("Length must be between {MIN_KEY_LENGTH} and {MAX_KEY_LENGTH}"),
                json!({ "len": length }),
            ));
        }

        if let Some(existing) = self
            .link_repository
            .find_by_original_url(original_url)
            .await?
        {
            info!("Found existing link for URL: {}", original_url);
            return Ok(existing);
        }

        let short_key = self.generate_unique_key(original_url, length).await?;

        let new_link = NewLink {
            short_key,
            original_url: original_url.to_string(),
        };

        match self.link_repository.save(new_link).await {
            Ok(link) => {
                info!("Created new link: {} -> {}", link.short_key, link.original_url);
                Ok(link)
            }
            Err(AppError::Storage(StoreError::UniqueViolation(constraint))) => {
                self.reconcile_concurrent_create(original_url, constraint)
                    .await
            }
            Err(e) => Err(e),
        }
    }

    /// Retrieves a link by its short key without counting a click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::LinkNotFound`] if no link has this key.
    pub async fn get_link(&self, short_key: &str) -> Result<Link, AppError> {
        debug!("Finding link by short key: {}", short_key);

        self.link_repository
            .find_by_short_key(short_key)
            .await?
            .ok_or_else(|| {
                warn!("Link not found for short key: {}", short_key);
                AppError::not_found(short_key)
            })
    }

    /// Counts one redirect through `short_key` and returns the updated link.
    ///
    /// The increment is performed by the store in one step, so concurrent
    /// redirects are all counted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::LinkNotFound`] if no link has this key.
    pub async fn resolve_and_count(&self, short_key: &str) -> Result<Link, AppError> {
        let link = self
            .link_repository
            .increment_click_count(short_key)
            .await?
            .ok_or_else(|| {
                warn!("Link not found for short key: {}", short_key);
                AppError::not_found(short_key)
            })?;

        debug!(
            "Link {} incremented to {} clicks",
            link.short_key, link.click_count
        );

        Ok(link)
    }

    /// Returns the number of stored links.
    pub async fn count_links(&self) -> Result<i64, AppError> {
        self.link_repository.count().await
    }

    /// Picks the first salted candidate key that is not stored yet.
    async fn generate_unique_key(&self, original_url: &str, length: usize) -> Result<String, AppError> {
        let mut attempt = 0;

        loop {
            let short_key = self.key_codec.encode(original_url, length, attempt);
            attempt += 1;
            debug!("Generation attempt {}: short key = {}", attempt, short_key);

            if is_reserved_key(&short_key) {
                debug!("Short key {} is reserved, trying next candidate", short_key);
            } else if !self.link_repository.exists_by_short_key(&short_key).await? {
                return Ok(short_key);
            }

            if attempt == MAX_ATTEMPTS {
                error!(
                    "Key generation exhausted: no unique short key after {} attempts, using {}",
                    MAX_ATTEMPTS, short_key
                );
                return Ok(short_key);
            }
        }
    }

    /// Returns the link stored by the writer that won a create race.
    ///
    /// A concurrent request for the same URL derives the same key, so the
    /// losing insert may report either constraint. If no link exists for the
    /// URL, the key was taken by a different URL and the violation stands.
    async fn reconcile_concurrent_create(
        &self,
        original_url: &str,
        constraint: UniqueConstraint,
    ) -> Result<Link, AppError> {
        match self
            .link_repository
            .find_by_original_url(original_url)
            .await?
        {
            Some(winner) => {
                info!(
                    "Concurrent create for URL {} resolved to {}",
                    original_url, winner.short_key
                );
                Ok(winner)
            }
            None => {
                error!(
                    "Short key for URL {} rejected on {} and no existing link found",
                    original_url, constraint
                );
                Err(StoreError::UniqueViolation(constraint).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn create_test_link(id: i64, short_key: &str, url: &str, click_count: i64) -> Link {
        Link::new(
            id,
            short_key.to_string(),
            url.to_string(),
            click_count,
            Utc::now(),
        )
    }

    #[test]
    fn test_reserved_keys() {
        assert!(is_reserved_key("health"));
        assert!(!is_reserved_key("Health"));
        assert!(!is_reserved_key("AbCdEf"));
    }

    fn service(repo: MockLinkRepository) -> LinkService<MockLinkRepository> {
        LinkService::new(Arc::new(repo), KeyCodec::default())
    }

    #[tokio::test]
    async fn test_create_short_link_success() {
        let mut mock_link_repo = MockLinkRepository::new();
        let expected_key = KeyCodec::default().encode("https://example.com", 6, 0);

        mock_link_repo
            .expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));

        mock_link_repo
            .expect_exists_by_short_key()
            .times(1)
            .returning(|_| Ok(false));

        let key = expected_key.clone();
        mock_link_repo
            .expect_save()
            .withf(move |new_link| {
                new_link.short_key == key && new_link.original_url == "https://example.com"
            })
            .times(1)
            .returning(|new_link| {
                Ok(create_test_link(
                    10,
                    &new_link.short_key,
                    &new_link.original_url,
                    0,
                ))
            });

        let result = service(mock_link_repo)
            .create_short_link("https://example.com", 6)
            .await;

        let link = result.unwrap();
        assert_eq!(link.short_key, expected_key);
        assert_eq!(link.short_key.len(), 6);
        assert_eq!(link.click_count, 0);
    }

    #[tokio::test]
    async fn test_create_short_link_deduplication() {
        let mut mock_link_repo = MockLinkRepository::new();

        let existing_link = create_test_link(5, "existing", "https://example.com", 42);
        mock_link_repo
            .expect_find_by_original_url()
            .times(1)
            .returning(move |_| Ok(Some(existing_link.clone())));

        mock_link_repo.expect_exists_by_short_key().times(0);
        mock_link_repo.expect_save().times(0);

        let link = service(mock_link_repo)
            .create_short_link("https://example.com", 8)
            .await
            .unwrap();

        assert_eq!(link.id, 5);
        assert_eq!(link.short_key, "existing");
        assert_eq!(link.click_count, 42);
    }

    #[tokio::test]
    async fn test_create_short_link_invalid_url() {
        let mock_link_repo = MockLinkRepository::new();

        let result = service(mock_link_repo)
            .create_short_link("invalid-url", 6)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::LinkInvalid { .. }));
    }

    #[tokio::test]
    async fn test_create_short_link_too_long() {
        let mock_link_repo = MockLinkRepository::new();
        let url = format!("https://{}.com", "a".repeat(130));

        let result = service(mock_link_repo).create_short_link(&url, 6).await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::LinkTooLong { length: 142 }
        ));
    }

    #[tokio::test]
    async fn test_create_short_link_rejects_key_length() {
        let mock_link_repo = MockLinkRepository::new();
        let service = service(mock_link_repo);

        for length in [0, 2, 13] {
            let result = service
                .create_short_link("https://example.com", length)
                .await;
            assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
        }
    }

    #[tokio::test]
    async fn test_create_short_link_retries_on_collision() {
        let mut mock_link_repo = MockLinkRepository::new();
        let codec = KeyCodec::default();
        let first = codec.encode("https://example.com", 6, 0);
        let third = codec.encode("https://example.com", 6, 2);

        mock_link_repo
            .expect_find_by_original_url()
            .returning(|_| Ok(None));

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        mock_link_repo
            .expect_exists_by_short_key()
            .times(3)
            .returning(move |_| Ok(counter.fetch_add(1, Ordering::SeqCst) < 2));

        let expected = third.clone();
        mock_link_repo
            .expect_save()
            .withf(move |new_link| new_link.short_key == expected)
            .times(1)
            .returning(|new_link| {
                Ok(create_test_link(1, &new_link.short_key, &new_link.original_url, 0))
            });

        let link = service(mock_link_repo)
            .create_short_link("https://example.com", 6)
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(link.short_key, third);
        assert_ne!(link.short_key, first);
    }

    #[tokio::test]
    async fn test_create_short_link_exhausted_uses_last_key() {
        let mut mock_link_repo = MockLinkRepository::new();
        let last = KeyCodec::default().encode("https://example.com", 6, 9);

        mock_link_repo
            .expect_find_by_original_url()
            .returning(|_| Ok(None));

        mock_link_repo
            .expect_exists_by_short_key()
            .times(10)
            .returning(|_| Ok(true));

        let expected = last.clone();
        mock_link_repo
            .expect_save()
            .withf(move |new_link| new_link.short_key == expected)
            .times(1)
            .returning(|new_link| {
                Ok(create_test_link(1, &new_link.short_key, &new_link.original_url, 0))
            });

        let link = service(mock_link_repo)
            .create_short_link("https://example.com", 6)
            .await
            .unwrap();

        assert_eq!(link.short_key, last);
    }

    #[tokio::test]
    async fn test_create_short_link_reconciles_concurrent_writer() {
        let mut mock_link_repo = MockLinkRepository::new();

        let lookups = Arc::new(AtomicUsize::new(0));
        let counter = lookups.clone();
        let winner = create_test_link(7, "Winner", "https://example.com", 3);
        mock_link_repo
            .expect_find_by_original_url()
            .times(2)
            .returning(move |_| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Ok(None)
                } else {
                    Ok(Some(winner.clone()))
                }
            });

        mock_link_repo
            .expect_exists_by_short_key()
            .returning(|_| Ok(false));

        mock_link_repo.expect_save().times(1).returning(|_| {
            Err(StoreError::UniqueViolation(UniqueConstraint::OriginalUrl).into())
        });

        let link = service(mock_link_repo)
            .create_short_link("https://example.com", 6)
            .await
            .unwrap();

        assert_eq!(link.id, 7);
        assert_eq!(link.short_key, "Winner");
    }

    #[tokio::test]
    async fn test_create_short_link_key_conflict_is_storage_error() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_original_url()
            .times(2)
            .returning(|_| Ok(None));

        mock_link_repo
            .expect_exists_by_short_key()
            .returning(|_| Ok(false));

        mock_link_repo.expect_save().times(1).returning(|_| {
            Err(StoreError::UniqueViolation(UniqueConstraint::ShortKey).into())
        });

        let result = service(mock_link_repo)
            .create_short_link("https://example.com", 6)
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::Storage(StoreError::UniqueViolation(UniqueConstraint::ShortKey))
        ));
    }

    #[tokio::test]
    async fn test_create_short_link_propagates_store_failure() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_original_url()
            .times(1)
            .returning(|_| Err(StoreError::Database("connection refused".to_string()).into()));

        mock_link_repo.expect_save().times(0);

        let result = service(mock_link_repo)
            .create_short_link("https://example.com", 6)
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::Storage(StoreError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_get_link_found() {
        let mut mock_link_repo = MockLinkRepository::new();

        let link = create_test_link(1, "AbCdEf", "https://example.com", 2);
        mock_link_repo
            .expect_find_by_short_key()
            .withf(|key| key == "AbCdEf")
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        mock_link_repo.expect_increment_click_count().times(0);

        let result = service(mock_link_repo).get_link("AbCdEf").await.unwrap();

        assert_eq!(result.original_url, "https://example.com");
        assert_eq!(result.click_count, 2);
    }

    #[tokio::test]
    async fn test_get_link_not_found() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_short_key()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(mock_link_repo).get_link("doesnotexist").await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::LinkNotFound { key } if key == "doesnotexist"
        ));
    }

    #[tokio::test]
    async fn test_resolve_and_count() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_increment_click_count()
            .withf(|key| key == "AbCdEf")
            .times(1)
            .returning(|key| Ok(Some(create_test_link(1, key, "https://example.com", 1))));

        let link = service(mock_link_repo)
            .resolve_and_count("AbCdEf")
            .await
            .unwrap();

        assert_eq!(link.click_count, 1);
    }

    #[tokio::test]
    async fn test_resolve_and_count_not_found() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_increment_click_count()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(mock_link_repo).resolve_and_count("missing").await;

        assert!(matches!(result.unwrap_err(), AppError::LinkNotFound { .. }));
    }
}
