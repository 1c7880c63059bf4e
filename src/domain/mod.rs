//! Domain layer containing business entities and repository contracts.
//!
//! This module is independent of infrastructure concerns. Repository traits
//! are implemented by [`crate::infrastructure::persistence`], and business
//! rules live in [`crate::application::services`].
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions

pub mod entities;
pub mod repositories;
