//! Core domain entities.
//!
//! Entities are plain data structures. Creation inputs use a separate struct
//! (`NewLink`) so that store-assigned fields never come from callers.

pub mod link;

pub use link::{Link, NewLink};
