//! Error types for stream URL resolution.

use thiserror::Error;

/// The step of the resolution chain that produced an upstream failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Fetching the provider page that carries the token URL.
    Page,
    /// Fetching the player token.
    PlayerToken,
    /// Fetching the stream link.
    StreamLink,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Page => "provider page",
            Self::PlayerToken => "player token",
            Self::StreamLink => "stream link",
        })
    }
}

/// Resolution errors
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("{step} request failed with status {status}")]
    Status {
        step: Step,
        status: reqwest::StatusCode,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Malformed {step} response: {source}")]
    Decode {
        step: Step,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed {0} response: missing {1}")]
    MissingField(Step, &'static str),

    #[error("No __NEXT_DATA__ script found on {0}")]
    NoPageData(String),

    #[error("HTTP client setup failed")]
    Client(#[source] reqwest::Error),
}

impl ResolveError {
    /// Returns the step this error is attributed to, if any.
    #[must_use]
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::Status { step, .. } | Self::Decode { step, .. } | Self::MissingField(step, _) => {
                Some(*step)
            }
            Self::NoPageData(_) => Some(Step::Page),
            Self::Http(_) | Self::Client(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
