//! The per-route resolution chain: page → token URL → player token → stream URL.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::link::StreamLinkClient;
use super::page::{NextDataResolver, PageTokenResolver};
use super::token::PlayerTokenClient;
use crate::error::Result;
use crate::routes::RouteSpec;

/// Anything that can turn a route into a live stream URL.
#[async_trait]
pub trait RouteResolver: Send + Sync {
    async fn resolve(&self, route: &RouteSpec) -> Result<String>;
}

/// Production resolver. Each step needs the previous step's output, so they
/// run strictly in order and the first failure ends the attempt.
pub struct ResolutionPipeline {
    pages: Arc<dyn PageTokenResolver>,
    tokens: PlayerTokenClient,
    links: StreamLinkClient,
}

impl ResolutionPipeline {
    pub fn new(
        pages: Arc<dyn PageTokenResolver>,
        tokens: PlayerTokenClient,
        links: StreamLinkClient,
    ) -> Self {
        Self {
            pages,
            tokens,
            links,
        }
    }

    /// Pipeline whose every step shares `client`, with token URLs read from
    /// the pages' `__NEXT_DATA__`.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self::new(
            Arc::new(NextDataResolver::new(client.clone())),
            PlayerTokenClient::new(client.clone()),
            StreamLinkClient::new(client),
        )
    }
}

#[async_trait]
impl RouteResolver for ResolutionPipeline {
    #[instrument(skip(self, route), fields(path = %route.path))]
    async fn resolve(&self, route: &RouteSpec) -> Result<String> {
        let token_url = self.pages.token_url(&route.page_url).await?;
        debug!(%token_url, "Found token URL");

        let player_token = self.tokens.fetch(&token_url).await?;
        debug!("Obtained player token");

        self.links.fetch(route, &player_token).await
    }
}
