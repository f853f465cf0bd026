//! Content repository access.
//!
//! The search corpus is read from a headless CMS. [`ContentRepository`] is the
//! seam between the corpus cache and wherever the records come from: the HTTP
//! [`CmsClient`] in production, [`InMemoryRepository`] for fixtures and
//! offline corpus files.

pub mod catalog;
pub mod cms;
pub mod downloads;
pub mod forms;
pub mod media;
pub mod memory;

use std::future::Future;
use yx_common::{SearchableArticle, SearchableProduct};

use crate::error::ContentError;

pub use cms::CmsClient;
pub use memory::InMemoryRepository;

/// Read side of the content repository used to build the search corpus.
pub trait ContentRepository: Send + Sync {
    /// The full product catalog.
    fn fetch_all_products(
        &self,
    ) -> impl Future<Output = Result<Vec<SearchableProduct>, ContentError>> + Send;

    /// Up to `limit` most recent articles.
    fn fetch_all_articles(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<SearchableArticle>, ContentError>> + Send;
}
