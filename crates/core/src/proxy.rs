//! Passthrough proxy for `/api/*`.
//!
//! Mounted under `/api`; a request for `/api/<rest>?<query>` is forwarded to
//! `<origin>/<rest>?<query>` with its method, headers and body. The upstream
//! status, headers and body are relayed back unchanged. Any failure to reach
//! the upstream becomes a plain `500`.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
const HOP_HEADERS: [&str; 8] = [
    "connection",
    "upgrade",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "te",
    "trailer",
    "host",
];

/// Body returned when the upstream cannot be reached.
pub const PROXY_ERROR_BODY: &str = "Error proxying to API";

#[derive(Debug, Clone)]
struct ProxyState {
    client: reqwest::Client,
    origin: String,
}

fn build_proxy_client(timeout: Duration) -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .timeout(timeout)
        .no_proxy()
        .no_gzip()
        .no_brotli()
        .no_deflate()
        .build()
        .map_err(|err| format!("Failed to build proxy HTTP client: {err}"))
}

/// Creates the API proxy router (nested at /api). An upstream that has not
/// answered within `timeout` gets the same `500` as an unreachable one.
pub fn api_router(origin: &str, timeout: Duration) -> Result<Router, String> {
    Url::parse(origin).map_err(|err| format!("Invalid proxy origin {origin}: {err}"))?;
    let state = ProxyState {
        client: build_proxy_client(timeout)?,
        origin: origin.trim_end_matches('/').to_string(),
    };
    debug!(origin = %state.origin, timeout_ms = timeout.as_millis(), "API proxy configured.");
    Ok(Router::new()
        .route("/", any(proxy_handler))
        .route("/{*path}", any(proxy_handler))
        .with_state(state))
}

async fn proxy_handler(State(state): State<ProxyState>, req: Request<Body>) -> Response {
    // nest strips the /api prefix, leaving /<rest>?<query>
    let path_and_query = req
        .uri()
        .path_and_query()
        .map_or_else(|| "/".to_string(), |pq| pq.as_str().to_string());
    proxy_http(req, &state, &path_and_query).await
}

async fn proxy_http(req: Request<Body>, state: &ProxyState, path_and_query: &str) -> Response {
    let (parts, body) = req.into_parts();
    let method = parts.method.clone();
    let start = Instant::now();
    info!("~> api {} {}", method, path_and_query);

    let url = format!("{}{path_and_query}", state.origin);
    let body_bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(error = %err, "Failed to read proxy request body.");
            return proxy_error();
        }
    };

    let mut builder = state.client.request(parts.method, &url);
    for (name, value) in &parts.headers {
        if is_hop_header(name.as_str()) {
            continue;
        }
        builder = builder.header(name, value);
    }

    let response = match builder.body(body_bytes).send().await {
        Ok(response) => response,
        Err(err) => {
            warn!(%url, error = %err, "Proxy request failed - could not reach upstream.");
            info!(
                "<~ api {} {} 500 [{}ms] (upstream failed: {})",
                method,
                path_and_query,
                start.elapsed().as_millis(),
                err
            );
            return proxy_error();
        }
    };

    let status = response.status();
    let headers = response.headers().clone();
    let body = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(%url, error = %err, "Failed to read proxy response body.");
            return proxy_error();
        }
    };

    info!(
        "<~ api {} {} {} [{}ms]",
        method,
        path_and_query,
        status.as_u16(),
        start.elapsed().as_millis()
    );

    let mut builder = Response::builder().status(status);
    for (name, value) in &headers {
        if is_hop_header(name.as_str()) {
            continue;
        }
        builder = builder.header(name, value);
    }
    builder
        .body(Body::from(body))
        .unwrap_or_else(|_| proxy_error())
}

fn proxy_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, PROXY_ERROR_BODY).into_response()
}

fn is_hop_header(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    HOP_HEADERS.iter().any(|header| *header == lower)
}
