//! Shared HTTP client for provider pages, player tokens and stream links.
//!
//! Features:
//! - HTTP/2 with fallback to HTTP/1.1
//! - TLS 1.3 via rustls
//! - Brotli and Gzip compression (auto-negotiated)
//! - Per-request timeout from the service configuration
//! - Browser-like request headers (provider pages reject bare clients)

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use tracing::debug;

use crate::error::{ResolveError, Result};

/// User-Agent sent with every upstream request.
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Build the client shared by every resolution step.
///
/// `timeout` bounds each request end to end; connecting is bounded by the
/// same value.
pub fn build_client(timeout: Duration) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("nl-NL,nl;q=0.9,en;q=0.8"));

    debug!(?timeout, "Building upstream HTTP client");

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        // Keep connections alive between refresh passes
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_nodelay(true)
        .use_rustls_tls()
        .brotli(true)
        .gzip(true)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(ResolveError::Client)
}
