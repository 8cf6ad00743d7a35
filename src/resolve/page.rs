//! Token URL extraction from provider live pages.
//!
//! NPO station sites are Next.js apps: the server-rendered page embeds its
//! props as JSON in `<script id="__NEXT_DATA__">`, and the player props
//! carry the URL that issues player tokens.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{ResolveError, Result, Step};

/// Capability: find the token-issuing URL for a provider page.
#[async_trait]
pub trait PageTokenResolver: Send + Sync {
    async fn token_url(&self, page_url: &str) -> Result<String>;
}

/// Resolves token URLs by fetching the page and reading `__NEXT_DATA__`.
pub struct NextDataResolver {
    client: Client,
}

impl NextDataResolver {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageTokenResolver for NextDataResolver {
    #[instrument(skip(self))]
    async fn token_url(&self, page_url: &str) -> Result<String> {
        let resp = self.client.get(page_url).send().await?;

        if !resp.status().is_success() {
            return Err(ResolveError::Status {
                step: Step::Page,
                status: resp.status(),
            });
        }

        let html = resp.text().await?;
        debug!(bytes = html.len(), "Fetched provider page");

        let data = extract_next_data(&html)
            .ok_or_else(|| ResolveError::NoPageData(page_url.to_string()))?;
        token_url_from_next_data(&data)
    }
}

/// Text content of the `__NEXT_DATA__` script, if present.
fn extract_next_data(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script#__NEXT_DATA__").ok()?;
    let content = document
        .select(&selector)
        .next()?
        .text()
        .collect::<String>();

    if content.trim().is_empty() {
        None
    } else {
        Some(content)
    }
}

fn token_url_from_next_data(json: &str) -> Result<String> {
    let data: NextData = serde_json::from_str(json).map_err(|source| ResolveError::Decode {
        step: Step::Page,
        source,
    })?;

    data.props
        .and_then(|p| p.page_props)
        .and_then(|p| p.player)
        .and_then(|p| p.token_url)
        .filter(|url| !url.is_empty())
        .ok_or(ResolveError::MissingField(Step::Page, "props.pageProps.player.tokenUrl"))
}

// Only the path down to the token URL is modelled; the rest of the page
// props are ignored.

#[derive(Debug, Deserialize)]
struct NextData {
    props: Option<NextProps>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NextProps {
    page_props: Option<PageProps>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    player: Option<PlayerProps>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerProps {
    token_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page_with(next_data: &str) -> String {
        format!(
            r#"<!DOCTYPE html><html><head><title>NPO Radio 2</title></head><body>
<div id="__next"></div>
<script id="__NEXT_DATA__" type="application/json">{next_data}</script>
</body></html>"#
        )
    }

    #[test]
    fn test_extracts_token_url() {
        let html = page_with(
            r#"{"props":{"pageProps":{"player":{"tokenUrl":"https://tokens.example/abc"}}},"page":"/live"}"#,
        );
        let json = extract_next_data(&html).unwrap();
        assert_eq!(
            token_url_from_next_data(&json).unwrap(),
            "https://tokens.example/abc"
        );
    }

    #[test]
    fn test_missing_script() {
        assert!(extract_next_data("<html><body><p>hi</p></body></html>").is_none());
    }

    #[test]
    fn test_missing_player() {
        let err = token_url_from_next_data(r#"{"props":{"pageProps":{}}}"#).unwrap_err();
        assert!(matches!(err, ResolveError::MissingField(Step::Page, _)));
    }

    #[test]
    fn test_empty_token_url() {
        let err =
            token_url_from_next_data(r#"{"props":{"pageProps":{"player":{"tokenUrl":""}}}}"#)
                .unwrap_err();
        assert!(matches!(err, ResolveError::MissingField(..)));
    }

    #[test]
    fn test_invalid_json() {
        let err = token_url_from_next_data("{not json").unwrap_err();
        assert!(matches!(err, ResolveError::Decode { step: Step::Page, .. }));
    }

    #[tokio::test]
    async fn test_resolver_fetches_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/live"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_with(
                r#"{"props":{"pageProps":{"player":{"tokenUrl":"https://tokens.example/xyz"}}}}"#,
            )))
            .mount(&server)
            .await;

        let resolver = NextDataResolver::new(Client::new());
        let url = resolver
            .token_url(&format!("{}/live", server.uri()))
            .await
            .unwrap();
        assert_eq!(url, "https://tokens.example/xyz");
    }

    #[tokio::test]
    async fn test_resolver_page_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let resolver = NextDataResolver::new(Client::new());
        let err = resolver.token_url(&server.uri()).await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Status { step: Step::Page, status } if status.as_u16() == 503
        ));
    }

    #[tokio::test]
    async fn test_resolver_page_without_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let resolver = NextDataResolver::new(Client::new());
        let err = resolver.token_url(&server.uri()).await.unwrap_err();
        assert!(matches!(err, ResolveError::NoPageData(_)));
    }
}
