//! Repository backed by records already in memory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;
use yx_common::{SearchableArticle, SearchableProduct};

use super::ContentRepository;
use crate::error::ContentError;

/// Fixed products and articles, e.g. loaded from a JSON corpus file:
///
/// ```json
/// { "products": [ ... ], "articles": [ ... ] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryRepository {
    pub products: Vec<SearchableProduct>,
    pub articles: Vec<SearchableArticle>,
}

impl InMemoryRepository {
    pub fn new(products: Vec<SearchableProduct>, articles: Vec<SearchableArticle>) -> Self {
        Self { products, articles }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ContentError> {
        let contents = fs::read_to_string(path).map_err(|source| ContentError::CorpusFile {
            path: path.to_path_buf(),
            source,
        })?;
        let repository: Self =
            serde_json::from_str(&contents).map_err(|source| ContentError::CorpusFormat {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(
            path = %path.display(),
            products = repository.products.len(),
            articles = repository.articles.len(),
            "Loaded corpus file."
        );
        Ok(repository)
    }
}

impl ContentRepository for InMemoryRepository {
    async fn fetch_all_products(&self) -> Result<Vec<SearchableProduct>, ContentError> {
        Ok(self.products.clone())
    }

    async fn fetch_all_articles(&self, limit: usize) -> Result<Vec<SearchableArticle>, ContentError> {
        Ok(self.articles.iter().take(limit).cloned().collect())
    }
}
