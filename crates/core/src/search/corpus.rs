//! Session-lifetime search corpus.
//!
//! The corpus is fetched once, on first activation, and then held read-only.
//! Readers never wait for the fetch: until it finishes they see an empty
//! corpus, and a failed collection stays empty for the rest of the session.

use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};
use yx_common::{SearchResult, SearchableArticle, SearchableProduct};

use super::engine;
use crate::content::ContentRepository;

/// Articles pulled into the corpus unless configured otherwise.
pub const DEFAULT_ARTICLE_LIMIT: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    pub products: Vec<SearchableProduct>,
    pub articles: Vec<SearchableArticle>,
}

impl Corpus {
    pub fn new(products: Vec<SearchableProduct>, articles: Vec<SearchableArticle>) -> Self {
        Self { products, articles }
    }

    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        engine::search(query, &self.products, &self.articles)
    }

    pub fn len(&self) -> usize {
        self.products.len() + self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.articles.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    /// No load has been requested yet.
    #[default]
    Idle,
    Loading,
    Loaded,
    /// One collection failed and is empty.
    Partial,
    /// Both collections failed; the corpus is empty.
    Failed,
}

impl LoadState {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadState::Idle => "idle",
            LoadState::Loading => "loading",
            LoadState::Loaded => "loaded",
            LoadState::Partial => "partial",
            LoadState::Failed => "failed",
        }
    }
}

#[derive(Debug, Default)]
struct CacheInner {
    state: LoadState,
    corpus: Arc<Corpus>,
}

/// Single owned corpus instance with an explicit load contract.
#[derive(Debug)]
pub struct CorpusCache {
    inner: RwLock<CacheInner>,
    article_limit: usize,
}

impl Default for CorpusCache {
    fn default() -> Self {
        Self::new(DEFAULT_ARTICLE_LIMIT)
    }
}

impl CorpusCache {
    pub fn new(article_limit: usize) -> Self {
        Self {
            inner: RwLock::new(CacheInner::default()),
            article_limit,
        }
    }

    /// A cache that starts out loaded with `corpus`.
    pub fn preloaded(corpus: Corpus) -> Self {
        Self {
            inner: RwLock::new(CacheInner {
                state: LoadState::Loaded,
                corpus: Arc::new(corpus),
            }),
            article_limit: DEFAULT_ARTICLE_LIMIT,
        }
    }

    pub fn state(&self) -> LoadState {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .state
    }

    /// True once a load attempt has finished, successfully or not.
    pub fn is_loaded(&self) -> bool {
        matches!(
            self.state(),
            LoadState::Loaded | LoadState::Partial | LoadState::Failed
        )
    }

    /// Current corpus. Empty while loading.
    pub fn snapshot(&self) -> Arc<Corpus> {
        Arc::clone(
            &self
                .inner
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .corpus,
        )
    }

    /// Search whatever is loaded right now.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        self.snapshot().search(query)
    }

    /// Move from `Idle` to `Loading`. Returns false if a load was already started.
    fn begin_load(&self) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.state != LoadState::Idle {
            return false;
        }
        inner.state = LoadState::Loading;
        true
    }

    /// Fetch the corpus from `repository`. Only the first call fetches; any
    /// later call returns the current state immediately.
    pub async fn load<R: ContentRepository>(&self, repository: &R) -> LoadState {
        if !self.begin_load() {
            let state = self.state();
            debug!(state = state.as_str(), "Corpus load already requested.");
            return state;
        }

        debug!(article_limit = self.article_limit, "Loading search corpus.");
        let (products, articles) = tokio::join!(
            repository.fetch_all_products(),
            repository.fetch_all_articles(self.article_limit)
        );

        let mut failures = 0;
        let products = products.unwrap_or_else(|err| {
            warn!(error = %err, "Failed to load products for search.");
            failures += 1;
            Vec::new()
        });
        let articles = articles.unwrap_or_else(|err| {
            warn!(error = %err, "Failed to load articles for search.");
            failures += 1;
            Vec::new()
        });

        let state = match failures {
            0 => LoadState::Loaded,
            1 => LoadState::Partial,
            _ => LoadState::Failed,
        };
        info!(
            products = products.len(),
            articles = articles.len(),
            state = state.as_str(),
            "Search corpus ready."
        );

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.corpus = Arc::new(Corpus::new(products, articles));
        inner.state = state;
        state
    }
}
