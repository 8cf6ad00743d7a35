//! `npo-grab` - live stream URL resolver and redirector for NPO radio
//!
//! Provider-issued stream URLs are short-lived and take three upstream
//! calls to obtain, so they are resolved ahead of time in the background
//! and served from a cache when a player asks for a route.
//!
//! # Architecture
//!
//! - [`RouteRegistry`]: static path → provider page / profile / DRM mapping
//! - [`ResolutionPipeline`]: page → token URL → player token → stream URL
//! - [`StreamCache`]: path → last resolved URL, with time-based freshness
//! - [`RefreshScheduler`]: resolves every route at start and on each interval
//! - [`router`]: `302` to a fresh cached URL, `404` otherwise
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use npo_grab::{
//!     build_client, router, LookupState, RefreshScheduler, ResolutionPipeline, RouteRegistry,
//!     StreamCache,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let interval = Duration::from_secs(2 * 60 * 60);
//! let client = build_client(Duration::from_secs(4))?;
//! let cache = StreamCache::new();
//!
//! RefreshScheduler::new(
//!     Arc::new(ResolutionPipeline::with_client(client)),
//!     Arc::new(RouteRegistry::npo_radio()),
//!     cache.clone(),
//!     interval,
//! )
//! .spawn();
//!
//! let app = router(LookupState { cache, refresh_interval: interval });
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod http_client;
pub mod resolve;
pub mod routes;
pub mod scheduler;
pub mod server;

pub use cache::{CacheEntry, Lookup, StreamCache};
pub use config::Config;
pub use error::{ResolveError, Result, Step};
pub use http_client::build_client;
pub use resolve::{
    NextDataResolver, PageTokenResolver, PlayerTokenClient, ResolutionPipeline, RouteResolver,
    StreamLinkClient,
};
pub use routes::{DrmType, Profile, RouteRegistry, RouteSpec};
pub use scheduler::{PassReport, RefreshScheduler};
pub use server::{router, serve, LookupState};

/// Version of npo-grab
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
