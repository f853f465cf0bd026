#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use wiremock::matchers::path;
use wiremock::{Mock, MockServer, ResponseTemplate};
use yx_common::{ResultKind, SearchableArticle, SearchableProduct};
use yx_core::InMemoryRepository;
use yx_core::search::CorpusCache;
use yx_core::server::{HealthResponse, SearchResponse, app_router, serve};

fn repository() -> InMemoryRepository {
    InMemoryRepository::new(
        vec![SearchableProduct {
            short_description: Some("Embedded controller".to_string()),
            ..SearchableProduct::new("p1", "YX-IPC-3000", "yx-ipc-3000")
        }],
        vec![SearchableArticle::new("n1", "IPC roadmap", "<p>2027 plans</p>")],
    )
}

async fn start_site(api_origin: &str) -> (SocketAddr, oneshot::Sender<()>) {
    let app = app_router(
        Arc::new(repository()),
        Arc::new(CorpusCache::default()),
        api_origin,
        Duration::from_secs(5),
    )
    .unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(serve(listener, app, async {
        let _ = rx.await;
    }));
    (addr, tx)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

async fn search(addr: SocketAddr, query: &str) -> SearchResponse {
    let url = url::Url::parse_with_params(&format!("http://{addr}/search"), &[("q", query)]).unwrap();
    client()
        .get(url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_search_loads_corpus_on_first_use() {
    let (addr, _shutdown) = start_site("http://127.0.0.1:1").await;

    let mut response = search(addr, "ipc").await;
    for _ in 0..50 {
        if response.state == "loaded" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        response = search(addr, "ipc").await;
    }

    assert_eq!(response.state, "loaded");
    assert_eq!(response.query, "ipc");
    assert_eq!(response.results.len(), 2);
    assert_eq!(response.results[0].kind, ResultKind::Product);
    assert_eq!(response.results[0].target_url, "/products/yx-ipc-3000");
    assert_eq!(response.results[1].target_url, "/news/n1");
}

#[tokio::test]
async fn test_blank_query_is_empty() {
    let (addr, _shutdown) = start_site("http://127.0.0.1:1").await;
    let response = search(addr, "   ").await;
    assert!(response.results.is_empty());
}

#[tokio::test]
async fn test_health() {
    let (addr, _shutdown) = start_site("http://127.0.0.1:1").await;
    let health: HealthResponse = client()
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.corpus, "idle");
    assert_eq!(health.products, 0);
}

#[tokio::test]
async fn test_api_is_proxied() {
    let upstream = MockServer::start().await;
    Mock::given(path("/api/news-articles"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":[]}"#))
        .mount(&upstream)
        .await;

    let (addr, _shutdown) = start_site(&upstream.uri()).await;
    let body = client()
        .get(format!("http://{addr}/api/api/news-articles"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, r#"{"data":[]}"#);
}
