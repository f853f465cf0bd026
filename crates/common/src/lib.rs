//! Shared types and utilities for the YX site search.
//!
//! This crate holds the searchable content model and the text helpers used
//! to build result previews. It is shared by `yx-core` and the `yx` CLI.

pub mod model;
pub mod text;

// Re-export commonly used types
pub use model::{ResultKind, SearchResult, SearchableArticle, SearchableProduct, SpecField};
pub use text::{collapse_whitespace, snippet, strip_markup};
