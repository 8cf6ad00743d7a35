//! Route registry: which request path maps to which provider stream.
//!
//! The registry is fixed at process start. Each [`RouteSpec`] pairs a
//! provider live page with a packaging profile and the DRM scheme the
//! stream-link service expects for it.

use std::collections::BTreeMap;

use serde::Serialize;

/// Stream-link service used by every NPO radio station.
pub const NPO_STREAM_LINK_URL: &str = "https://prod.npoplayer.nl/stream-link";

/// DRM scheme requested from the stream-link service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrmType {
    Fairplay,
    Widevine,
}

impl DrmType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fairplay => "fairplay",
            Self::Widevine => "widevine",
        }
    }
}

/// Streaming packaging format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Hls,
    Dash,
}

impl Profile {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hls => "hls",
            Self::Dash => "dash",
        }
    }
}

impl std::fmt::Display for DrmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One externally addressable route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    /// Request path, including the leading slash (e.g. `/nporadio1.m3u8`).
    pub path: String,
    pub drm_type: DrmType,
    pub profile: Profile,
    /// Provider live page carrying the player token URL.
    pub page_url: String,
    /// Stream-link endpoint the final URL is requested from.
    pub resolver_endpoint: String,
}

impl RouteSpec {
    pub fn new(
        path: impl Into<String>,
        drm_type: DrmType,
        profile: Profile,
        page_url: impl Into<String>,
        resolver_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            drm_type,
            profile,
            page_url: page_url.into(),
            resolver_endpoint: resolver_endpoint.into(),
        }
    }
}

/// Immutable set of routes keyed by path.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: BTreeMap<String, RouteSpec>,
}

impl RouteRegistry {
    /// Build a registry from explicit routes. A later route with the same
    /// path replaces an earlier one, so each path maps to exactly one route.
    pub fn from_routes(routes: impl IntoIterator<Item = RouteSpec>) -> Self {
        let routes = routes
            .into_iter()
            .map(|route| (route.path.clone(), route))
            .collect();
        Self { routes }
    }

    /// The NPO radio stations, each exposed as HLS/FairPlay and DASH/Widevine.
    #[must_use]
    pub fn npo_radio() -> Self {
        const STATIONS: &[(&str, &str)] = &[
            ("nporadio1", "https://www.nporadio1.nl/live"),
            ("nporadio2", "https://www.nporadio2.nl/live"),
            ("npo3fm", "https://www.npo3fm.nl/live"),
            ("npoklassiek", "https://www.nporadio4.nl/live"),
            ("funx", "https://www.funx.nl/live"),
        ];

        Self::from_routes(STATIONS.iter().flat_map(|(name, page)| {
            [
                RouteSpec::new(
                    format!("/{name}.m3u8"),
                    DrmType::Fairplay,
                    Profile::Hls,
                    *page,
                    NPO_STREAM_LINK_URL,
                ),
                RouteSpec::new(
                    format!("/{name}.mpd"),
                    DrmType::Widevine,
                    Profile::Dash,
                    *page,
                    NPO_STREAM_LINK_URL,
                ),
            ]
        }))
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&RouteSpec> {
        self.routes.get(path)
    }

    /// Routes in path order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteSpec> {
        self.routes.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
