//! Stream-link client: trades a player token for the final stream URL.

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::{ResolveError, Result, Step};
use crate::routes::{DrmType, Profile, RouteSpec};

/// Request body for the stream-link service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamLinkRequest<'a> {
    pub profile_name: Profile,
    pub drm_type: DrmType,
    pub referrer_url: &'a str,
}

impl<'a> From<&'a RouteSpec> for StreamLinkRequest<'a> {
    fn from(route: &'a RouteSpec) -> Self {
        Self {
            profile_name: route.profile,
            drm_type: route.drm_type,
            referrer_url: &route.page_url,
        }
    }
}

#[derive(Clone)]
pub struct StreamLinkClient {
    client: Client,
}

impl StreamLinkClient {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// `POST` the route's profile/DRM to its resolver endpoint, authorised
    /// with `player_token`, and return `stream.streamURL`.
    #[instrument(skip(self, route, player_token), fields(path = %route.path, profile = %route.profile))]
    pub async fn fetch(&self, route: &RouteSpec, player_token: &str) -> Result<String> {
        let resp = self
            .client
            .post(&route.resolver_endpoint)
            .header(AUTHORIZATION, player_token)
            .header(CONTENT_TYPE, "application/json")
            .json(&StreamLinkRequest::from(route))
            .send()
            .await?;

        if resp.status() != reqwest::StatusCode::OK {
            return Err(ResolveError::Status {
                step: Step::StreamLink,
                status: resp.status(),
            });
        }

        let body = resp.bytes().await?;
        let data: StreamLinkResponse =
            serde_json::from_slice(&body).map_err(|source| ResolveError::Decode {
                step: Step::StreamLink,
                source,
            })?;

        let stream_url = data
            .stream
            .and_then(|s| s.stream_url)
            // The URL ends up in a `Location` header.
            .filter(|url| !url.is_empty() && HeaderValue::from_str(url).is_ok())
            .ok_or(ResolveError::MissingField(Step::StreamLink, "stream.streamURL"))?;

        info!(
            page_url = %route.page_url,
            stream_url = %stream_url,
            "Fetched stream URL"
        );

        Ok(stream_url)
    }
}

#[derive(Debug, Deserialize)]
struct StreamLinkResponse {
    stream: Option<StreamLinkStream>,
}

#[derive(Debug, Deserialize)]
struct StreamLinkStream {
    #[serde(rename = "streamURL")]
    stream_url: Option<String>,
}
