//! Player token client.

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{ResolveError, Result, Step};

/// Fetches short-lived bearer tokens from a token-issuing URL.
#[derive(Clone)]
pub struct PlayerTokenClient {
    client: Client,
}

impl PlayerTokenClient {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// `GET <token_url>` and return the `playerToken` field.
    #[instrument(skip(self))]
    pub async fn fetch(&self, token_url: &str) -> Result<String> {
        let resp = self.client.get(token_url).send().await?;

        if resp.status() != reqwest::StatusCode::OK {
            return Err(ResolveError::Status {
                step: Step::PlayerToken,
                status: resp.status(),
            });
        }

        let body = resp.bytes().await?;
        let data: PlayerTokenResponse =
            serde_json::from_slice(&body).map_err(|source| ResolveError::Decode {
                step: Step::PlayerToken,
                source,
            })?;

        data.player_token
            .filter(|token| !token.is_empty())
            .ok_or(ResolveError::MissingField(Step::PlayerToken, "playerToken"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerTokenResponse {
    player_token: Option<String>,
}
