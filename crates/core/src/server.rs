//! Site server: search endpoint, health check and the `/api` proxy.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, info};
use yx_common::SearchResult;

use crate::config::SiteConfig;
use crate::content::{CmsClient, ContentRepository};
use crate::proxy;
use crate::search::{CorpusCache, LoadState};

struct AppState<R> {
    repository: Arc<R>,
    cache: Arc<CorpusCache>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<R: ContentRepository + 'static> AppState<R> {
    /// Kick off the corpus load in the background if nothing has started it.
    fn ensure_loading(&self) {
        if self.cache.state() != LoadState::Idle {
            return;
        }
        let cache = Arc::clone(&self.cache);
        let repository = Arc::clone(&self.repository);
        tokio::spawn(async move {
            cache.load(repository.as_ref()).await;
        });
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    /// Corpus load state at the time of the search.
    pub state: String,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub corpus: String,
    pub products: usize,
    pub articles: usize,
}

/// Full application router. `api_origin` is where `/api/*` is forwarded,
/// giving up after `api_timeout`.
pub fn app_router<R: ContentRepository + 'static>(
    repository: Arc<R>,
    cache: Arc<CorpusCache>,
    api_origin: &str,
    api_timeout: Duration,
) -> Result<Router, String> {
    let state = AppState { repository, cache };
    let api_router = proxy::api_router(api_origin, api_timeout)?;

    Ok(Router::new()
        .route("/search", get(search::<R>))
        .route("/health", get(health::<R>))
        .with_state(state)
        .nest("/api", api_router))
}

async fn search<R: ContentRepository + 'static>(
    State(state): State<AppState<R>>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    state.ensure_loading();
    let results = state.cache.search(&params.q);
    debug!(query = %params.q, results = results.len(), "Served search.");
    Json(SearchResponse {
        query: params.q,
        state: state.cache.state().as_str().to_string(),
        results,
    })
}

async fn health<R: ContentRepository + 'static>(
    State(state): State<AppState<R>>,
) -> (StatusCode, Json<HealthResponse>) {
    let corpus = state.cache.snapshot();
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            corpus: state.cache.state().as_str().to_string(),
            products: corpus.products.len(),
            articles: corpus.articles.len(),
        }),
    )
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), String>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|err| format!("Server error: {err}"))
}

/// Bind the configured address and serve the site until Ctrl-C.
pub async fn run_server(config: &SiteConfig) -> Result<(), String> {
    let repository = Arc::new(CmsClient::new(&config.cms).map_err(|err| err.to_string())?);
    let cache = Arc::new(CorpusCache::new(config.search.article_limit));
    let app = app_router(repository, cache, &config.cms.base_url, config.cms.timeout())?;

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|err| format!("Failed to bind {address}: {err}"))?;
    let local = listener
        .local_addr()
        .map_err(|err| format!("Failed to read bound address: {err}"))?;
    info!(address = %local, cms = %config.cms.base_url, "Site server listening.");

    serve(listener, app, async {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Ctrl-C received, shutting down server.");
        }
    })
    .await?;
    info!("Site server stopped.");
    Ok(())
}
