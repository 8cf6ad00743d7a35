//! Background refresh of every route's stream URL.
//!
//! The scheduler resolves the whole registry once immediately, then again on
//! every tick of the refresh interval, until its cancellation token fires.
//! Routes within a pass are resolved concurrently and independently: one
//! route failing never stops the others, and a failed route keeps whatever
//! it had in the cache.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cache::StreamCache;
use crate::resolve::RouteResolver;
use crate::routes::{RouteRegistry, RouteSpec};

/// Outcome of one resolution pass.
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    /// `(path, stream_url)` for every route that resolved.
    pub resolved: Vec<(String, String)>,
    /// `(path, error)` for every route that failed.
    pub failed: Vec<(String, String)>,
}

impl PassReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct RefreshScheduler {
    resolver: Arc<dyn RouteResolver>,
    registry: Arc<RouteRegistry>,
    cache: StreamCache,
    refresh_interval: Duration,
    cancel: CancellationToken,
}

impl RefreshScheduler {
    /// # Panics
    ///
    /// Panics if `refresh_interval` is zero.
    pub fn new(
        resolver: Arc<dyn RouteResolver>,
        registry: Arc<RouteRegistry>,
        cache: StreamCache,
        refresh_interval: Duration,
    ) -> Self {
        assert!(!refresh_interval.is_zero(), "refresh interval must be non-zero");
        Self {
            resolver,
            registry,
            cache,
            refresh_interval,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop on `token` instead of a private token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops the refresh loop when cancelled.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Resolve every route once and cache each success.
    pub async fn run_pass(&self) -> PassReport {
        let started = Instant::now();
        let outcomes = join_all(self.registry.iter().map(|route| self.refresh_route(route))).await;

        let mut report = PassReport::default();
        for (path, outcome) in outcomes {
            match outcome {
                Ok(url) => report.resolved.push((path, url)),
                Err(e) => report.failed.push((path, e)),
            }
        }

        info!(
            resolved = report.resolved.len(),
            failed = report.failed.len(),
            elapsed = ?started.elapsed(),
            "Refresh pass finished"
        );
        report
    }

    async fn refresh_route(&self, route: &RouteSpec) -> (String, Result<String, String>) {
        match self.resolver.resolve(route).await {
            Ok(url) => {
                self.cache.put(&route.path, url.clone(), Instant::now()).await;
                (route.path.clone(), Ok(url))
            }
            Err(e) => {
                warn!(
                    path = %route.path,
                    page_url = %route.page_url,
                    profile = %route.profile,
                    error = %e,
                    "Failed to refresh stream URL"
                );
                (route.path.clone(), Err(e.to_string()))
            }
        }
    }

    /// Run passes until cancelled. The first pass starts immediately.
    ///
    /// Cancellation is checked only while waiting for the next tick; a pass
    /// that has started runs to completion.
    pub async fn run(self) {
        let mut ticker = interval(self.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            routes = self.registry.len(),
            interval = %humantime::format_duration(self.refresh_interval),
            "Refresh scheduler started"
        );

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    info!("Refresh scheduler stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_pass().await;
                }
            }
        }
    }

    /// Spawn [`run`](Self::run) onto the runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
