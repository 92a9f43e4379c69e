use serde::{Deserialize, Serialize};

/// Body of `GET /svc/topstories/v2/{section}.json`.
///
/// `results` is required: a payload without it is a decode failure rather
/// than an empty page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopStoriesResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub num_results: Option<u32>,
    pub results: Vec<Story>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Story {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "abstract", default)]
    pub summary: String,
    /// `null`, absent and present-but-short are three different cases for
    /// the card renderer, so this is not flattened to an empty Vec.
    #[serde(default)]
    pub multimedia: Option<Vec<Multimedia>>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub byline: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Multimedia {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}
