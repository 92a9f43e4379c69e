//! Error types for fetching, rendering and page handling.
//!
//! - `FeedError`: talking to the Top Stories API
//! - `RenderError`: turning stories into card markup
//! - `LoadError`: the feed loader as a whole (wraps the two above)
//! - `SelectorError`: malformed page selectors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("no API key configured (set NYT_API_KEY or api_key in config.toml)")]
    MissingApiKey,

    #[error("invalid endpoint url: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned HTTP {status}")]
    Status { status: u16 },

    #[error("response too large (>{limit} bytes)")]
    TooLarge { limit: usize },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RenderError {
    /// The card image is taken from a fixed multimedia slot; stories that
    /// carry fewer entries than that cannot be rendered.
    #[error("story {url:?} has {len} multimedia entries, card image needs index {index}")]
    MediaIndexOutOfRange { url: String, index: usize, len: usize },

    #[error("template failed: {0}")]
    Template(#[from] askama::Error),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("page has no element matching {0}")]
    MissingContainer(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("selector {0:?} has no name after its prefix")]
    MissingName(String),
}
