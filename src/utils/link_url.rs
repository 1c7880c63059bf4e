//! Rules applied to original URLs before they are shortened or followed.
//!
//! The validity check is intentionally shallow: a URL is accepted when it is
//! at most [`MAX_URL_LENGTH`] characters long, longer than 4 characters and
//! contains a dot. It is not a general URL parser.

use crate::error::AppError;

/// Maximum accepted URL length, in characters.
pub const MAX_URL_LENGTH: usize = 128;

/// URLs of this length or shorter are rejected.
const MIN_EXCLUSIVE_LENGTH: usize = 4;

/// Checks an original URL against the length limit and the syntactic rule.
///
/// # Errors
///
/// Returns [`AppError::LinkTooLong`] if the URL exceeds [`MAX_URL_LENGTH`]
/// characters, then [`AppError::LinkInvalid`] if it has no `.` or is too short.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_original_url("https://example.com").is_ok());
/// assert!(validate_original_url("invalid-url").is_err()); // no dot
/// assert!(validate_original_url("a.b").is_err());         // too short
/// ```
pub fn validate_original_url(url: &str) -> Result<(), AppError> {
    let length = url.chars().count();

    if length > MAX_URL_LENGTH {
        return Err(AppError::LinkTooLong { length });
    }

    if !url.contains('.') || length <= MIN_EXCLUSIVE_LENGTH {
        return Err(AppError::LinkInvalid {
            url: url.to_string(),
        });
    }

    Ok(())
}

/// Builds the `Location` target for a redirect.
///
/// Stored URLs without an `http://` or `https://` scheme are sent to HTTPS.
pub fn redirect_target(original_url: &str) -> String {
    if original_url.starts_with("http://") || original_url.starts_with("https://") {
        original_url.to_string()
    } else {
        format!("https://{original_url}")
    }
}
