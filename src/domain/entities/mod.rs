//! Core domain entities.
//!
//! Entities are plain data structures. Creation and partial updates use
//! separate types:
//!
//! - [`Link`] - A stored short link
//! - [`NewLink`] - Input for creating a link
//! - [`LinkPatch`] - Partial update of an existing link

pub mod link;

pub use link::{Link, LinkPatch, MAX_ALIAS_LENGTH, MAX_SHORT_CODE_LENGTH, MAX_URL_LENGTH, NewLink};
