//! Query scoring and result assembly.

use tracing::trace;
use yx_common::{ResultKind, SearchResult, SearchableArticle, SearchableProduct, snippet};

use super::weights::{ARTICLE_FIELDS, PRODUCT_FIELDS, score};

/// Upper bound on returned results.
pub const MAX_RESULTS: usize = 10;

/// Description shown for a product without a short description ("no description available").
pub const NO_DESCRIPTION: &str = "暂无描述";

/// Visible characters kept in an article preview.
pub const SNIPPET_CHARS: usize = 100;

/// Rank products and articles against `query`.
///
/// An empty or whitespace-only query is the idle state and returns nothing
/// without scoring. Otherwise every item with a positive score is returned,
/// products first then articles, stably sorted by descending score and capped
/// at [`MAX_RESULTS`].
pub fn search(
    query: &str,
    products: &[SearchableProduct],
    articles: &[SearchableArticle],
) -> Vec<SearchResult> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    let mut results: Vec<SearchResult> = products
        .iter()
        .filter_map(|product| {
            let score = product_score(product, &needle);
            (score > 0).then(|| product_result(product, score))
        })
        .chain(articles.iter().filter_map(|article| {
            let score = article_score(article, &needle);
            (score > 0).then(|| article_result(article, score))
        }))
        .collect();

    let matched = results.len();
    // sort_by is stable: equal scores keep scan order
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results.truncate(MAX_RESULTS);

    trace!(query, matched, returned = results.len(), "Search complete.");
    results
}

/// Relevance of a product for an already lower-cased needle.
pub fn product_score(product: &SearchableProduct, needle: &str) -> u32 {
    score(product, PRODUCT_FIELDS, needle)
}

/// Relevance of an article for an already lower-cased needle.
pub fn article_score(article: &SearchableArticle, needle: &str) -> u32 {
    score(article, ARTICLE_FIELDS, needle)
}

fn product_result(product: &SearchableProduct, score: u32) -> SearchResult {
    let description = product
        .short_description
        .as_deref()
        .filter(|text| !text.is_empty())
        .unwrap_or(NO_DESCRIPTION)
        .to_string();
    SearchResult {
        kind: ResultKind::Product,
        id: product.id.clone(),
        title: product.name.clone(),
        description,
        target_url: product.target_url(),
        thumbnail_url: product.thumbnail_url.clone(),
        score,
    }
}

fn article_result(article: &SearchableArticle, score: u32) -> SearchResult {
    SearchResult {
        kind: ResultKind::Article,
        id: article.id.clone(),
        title: article.title.clone(),
        description: snippet(&article.body_text, SNIPPET_CHARS),
        target_url: article.target_url(),
        thumbnail_url: article.thumbnail_url.clone(),
        score,
    }
}
