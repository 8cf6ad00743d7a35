//! HTTP lookup surface: redirect a route path to its cached stream URL.
//!
//! Every request goes through one fallback handler. A fresh cache entry
//! yields `302 Found`; a missing or expired entry, or a path that is not a
//! route at all, yields `404 Not Found`. Requests never trigger a
//! resolution themselves.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cache::StreamCache;

/// Body of every 404 response.
pub const NOT_FOUND_BODY: &str = "Stream URL not found or expired";

/// State shared by request handlers.
#[derive(Clone)]
pub struct LookupState {
    pub cache: StreamCache,
    pub refresh_interval: Duration,
}

/// Router with the lookup handler on every path.
pub fn router(state: LookupState) -> Router {
    Router::new().fallback(lookup).with_state(state)
}

async fn lookup(State(state): State<LookupState>, request: Request) -> Response {
    let path = request.uri().path();
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default();
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    info!(method = %request.method(), path, %remote, user_agent, "Lookup");

    let lookup = state
        .cache
        .get(path, Instant::now(), state.refresh_interval)
        .await;

    match lookup.fresh_url().map(HeaderValue::from_str) {
        Some(Ok(location)) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
        Some(Err(_)) => {
            warn!(path, "Cached stream URL is not a valid Location header");
            (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
        }
        None => (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response(),
    }
}

/// Serve `router` on `port` until `shutdown` is cancelled.
pub async fn serve(port: u16, router: Router, shutdown: CancellationToken) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server running at port {port} 🚀");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { shutdown.cancelled().await })
    .await?;

    info!("Server shut down gracefully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const INTERVAL: Duration = Duration::from_millis(100);

    fn app(cache: &StreamCache) -> Router {
        router(LookupState {
            cache: cache.clone(),
            refresh_interval: INTERVAL,
        })
    }

    async fn get(app: Router, path: &str) -> Response {
        app.oneshot(
            axum::http::Request::builder()
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_fresh_entry_redirects() {
        let cache = StreamCache::new();
        cache
            .put("/nporadio1.m3u8", "https://cdn.example/r1.m3u8?t=1", Instant::now())
            .await;

        let resp = get(app(&cache), "/nporadio1.m3u8").await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "https://cdn.example/r1.m3u8?t=1"
        );
    }

    #[tokio::test]
    async fn test_missing_entry_is_not_found() {
        let cache = StreamCache::new();
        let resp = get(app(&cache), "/nporadio1.mpd").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], NOT_FOUND_BODY.as_bytes());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_entry_is_not_found() {
        let cache = StreamCache::new();
        cache.put("/a", "https://x/1", Instant::now()).await;

        tokio::time::advance(INTERVAL).await;
        let resp = get(app(&cache), "/a").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_path_matches_missing() {
        let cache = StreamCache::new();
        cache.put("/a", "https://x/1", Instant::now()).await;

        for path in ["/", "/unknown.m3u8", "/a/b"] {
            let resp = get(app(&cache), path).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
        }
    }

    #[tokio::test]
    async fn test_unsendable_url_is_not_found() {
        let cache = StreamCache::new();
        cache
            .put("/b", "https://cdn.example/x\n.m3u8", Instant::now())
            .await;

        let resp = get(app(&cache), "/b").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.headers().get(header::LOCATION).is_none());
    }

    #[tokio::test]
    async fn test_query_string_ignored() {
        let cache = StreamCache::new();
        cache.put("/a", "https://x/1", Instant::now()).await;

        let resp = get(app(&cache), "/a?player=vlc").await;
        assert_eq!(resp.status(), StatusCode::FOUND);
    }
}
