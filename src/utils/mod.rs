//! Utility functions shared by the service and the API layer.
//!
//! - [`key_codec`] - Deterministic short key encoding
//! - [`link_url`] - Original URL checks and redirect targets

pub mod key_codec;
pub mod link_url;
