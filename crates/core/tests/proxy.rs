#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::Router;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yx_core::proxy::{PROXY_ERROR_BODY, api_router};
use yx_core::server::serve;

/// Serve `/api` → `origin` on a random local port.
async fn start_proxy(origin: &str) -> (SocketAddr, oneshot::Sender<()>) {
    start_proxy_with_timeout(origin, Duration::from_secs(5)).await
}

async fn start_proxy_with_timeout(
    origin: &str,
    timeout: Duration,
) -> (SocketAddr, oneshot::Sender<()>) {
    let app = Router::new().nest("/api", api_router(origin, timeout).unwrap());
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

async fn get(url: String) -> reqwest::Response {
    client().get(url).send().await.unwrap()
}

#[tokio::test]
async fn test_get_forwarded_with_query() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/product-infos"))
        .and(query_param("populate", "image"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-upstream", "cms")
                .set_body_string(r#"{"data":[]}"#),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let (addr, _shutdown) = start_proxy(&upstream.uri()).await;
    let response = get(format!("http://{addr}/api/api/product-infos?populate=image")).await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["x-upstream"], "cms");
    assert_eq!(response.text().await.unwrap(), r#"{"data":[]}"#);
}

#[tokio::test]
async fn test_post_body_and_headers_preserved() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/custom-requestes"))
        .and(header("authorization", "Bearer abc"))
        .and(body_string(r#"{"data":{"name":"Li"}}"#))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&upstream)
        .await;

    let (addr, _shutdown) = start_proxy(&upstream.uri()).await;
    let response = client()
        .post(format!("http://{addr}/api/api/custom-requestes"))
        .header("authorization", "Bearer abc")
        .body(r#"{"data":{"name":"Li"}}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    assert_eq!(response.text().await.unwrap(), "created");
}

#[tokio::test]
async fn test_upstream_status_relayed() {
    let upstream = MockServer::start().await;
    Mock::given(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&upstream)
        .await;

    let (addr, _shutdown) = start_proxy(&upstream.uri()).await;
    let response = get(format!("http://{addr}/api/missing")).await;

    assert_eq!(response.status(), 404);
    assert_eq!(response.text().await.unwrap(), "not found");
}

#[tokio::test]
async fn test_redirects_followed() {
    let upstream = MockServer::start().await;
    Mock::given(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/new"))
        .mount(&upstream)
        .await;
    Mock::given(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved here"))
        .mount(&upstream)
        .await;

    let (addr, _shutdown) = start_proxy(&upstream.uri()).await;
    let response = get(format!("http://{addr}/api/old")).await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "moved here");
}

#[tokio::test]
async fn test_unreachable_upstream_is_500() {
    // Nothing listens on port 1.
    let (addr, _shutdown) = start_proxy("http://127.0.0.1:1").await;
    let response = get(format!("http://{addr}/api/api/product-infos")).await;

    assert_eq!(response.status(), 500);
    assert_eq!(response.text().await.unwrap(), PROXY_ERROR_BODY);
}

#[tokio::test]
async fn test_stalled_upstream_times_out_with_500() {
    // Accepts connections and never answers.
    let stalled = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let origin = format!("http://{}", stalled.local_addr().unwrap());
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = stalled.accept().await {
            held.push(socket);
        }
    });

    let (addr, _shutdown) = start_proxy_with_timeout(&origin, Duration::from_millis(300)).await;
    let started = Instant::now();
    let response = tokio::time::timeout(
        Duration::from_secs(10),
        get(format!("http://{addr}/api/api/product-infos")),
    )
    .await
    .expect("proxy should answer once the upstream timeout elapses");

    assert_eq!(response.status(), 500);
    assert_eq!(response.text().await.unwrap(), PROXY_ERROR_BODY);
    assert!(started.elapsed() < Duration::from_secs(10));
}
