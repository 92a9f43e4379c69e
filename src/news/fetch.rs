use super::model::{Story, TopStoriesResponse};
use crate::config::RuntimeConfig;
use crate::error::FeedError;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

// 5 MB cap
const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Where the feed loader gets its stories from.
#[async_trait]
pub trait StorySource: Send + Sync {
    async fn top_stories(&self) -> Result<Vec<Story>, FeedError>;
}

/// Client for the NYT Top Stories API.
pub struct TopStoriesClient {
    client: Client,
    api_base: Url,
    section: String,
    api_key: Option<String>,
}

impl TopStoriesClient {
    pub fn new(cfg: &RuntimeConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent("topstories/0.1")
            .gzip(true)
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self {
            client,
            api_base: cfg.api_base.clone(),
            section: cfg.section.clone(),
            api_key: cfg.api_key.clone(),
        })
    }

    /// Full request URL, key included. Never log this; see [`redacted`].
    pub fn endpoint(&self) -> Result<Url, FeedError> {
        let key = self.api_key.as_deref().ok_or(FeedError::MissingApiKey)?;
        let mut url = self
            .api_base
            .join(&format!("svc/topstories/v2/{}.json", self.section))?;
        url.query_pairs_mut().append_pair("api-key", key);
        Ok(url)
    }
}

#[async_trait]
impl StorySource for TopStoriesClient {
    async fn top_stories(&self) -> Result<Vec<Story>, FeedError> {
        let url = self.endpoint()?;
        info!(endpoint = %redacted(&url), "fetching top stories");

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status { status: status.as_u16() });
        }

        let mut stream = resp.bytes_stream();
        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = stream.next().await {
            let c = chunk?;
            if buf.len() + c.len() > MAX_BODY_BYTES {
                return Err(FeedError::TooLarge { limit: MAX_BODY_BYTES });
            }
            buf.extend_from_slice(&c);
        }
        debug!(bytes = buf.len(), "response body read");

        let parsed: TopStoriesResponse = serde_json::from_slice(&buf)?;
        info!(
            count = parsed.results.len(),
            section = parsed.section.as_deref().unwrap_or(&self.section),
            "top stories received"
        );
        Ok(parsed.results)
    }
}

/// The URL with its query string dropped, safe to log.
pub fn redacted(url: &Url) -> String {
    format!("{}{}", url.origin().ascii_serialization(), url.path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, resolve};
    use mockito::Matcher;

    fn config(base: &str, key: Option<&str>) -> RuntimeConfig {
        let file = AppConfig {
            api_base: Some(base.to_string()),
            ..AppConfig::default()
        };
        resolve(file, key.map(String::from), None).unwrap()
    }

    const BODY: &str = r#"{
        "status": "OK",
        "section": "nyregion",
        "results": [
            {"title": "First", "abstract": "One",
             "url": "https://www.nytimes.com/1.html", "multimedia": null},
            {"title": "Second", "abstract": "Two",
             "url": "https://www.nytimes.com/2.html"}
        ]
    }"#;

    #[test]
    fn endpoint_carries_section_and_key() {
        let cfg = config("https://api.nytimes.com", Some("k3y"));
        let client = TopStoriesClient::new(&cfg).unwrap();
        let url = client.endpoint().unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.nytimes.com/svc/topstories/v2/nyregion.json?api-key=k3y"
        );
        assert_eq!(
            redacted(&url),
            "https://api.nytimes.com/svc/topstories/v2/nyregion.json"
        );
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let client = TopStoriesClient::new(&config(&server.url(), None)).unwrap();
        assert!(matches!(
            client.top_stories().await,
            Err(FeedError::MissingApiKey)
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetches_and_decodes_results() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/svc/topstories/v2/nyregion.json")
            .match_query(Matcher::UrlEncoded("api-key".into(), "secret".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .expect(1)
            .create_async()
            .await;

        let client = TopStoriesClient::new(&config(&server.url(), Some("secret"))).unwrap();
        let stories = client.top_stories().await.unwrap();
        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].title, "First");
        assert_eq!(stories[1].summary, "Two");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/svc/topstories/v2/nyregion.json")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"fault":{"faultstring":"Invalid ApiKey"}}"#)
            .create_async()
            .await;

        let client = TopStoriesClient::new(&config(&server.url(), Some("bad"))).unwrap();
        assert!(matches!(
            client.top_stories().await,
            Err(FeedError::Status { status: 401 })
        ));
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/svc/topstories/v2/nyregion.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{\"results\": [")
            .create_async()
            .await;

        let client = TopStoriesClient::new(&config(&server.url(), Some("k"))).unwrap();
        assert!(matches!(
            client.top_stories().await,
            Err(FeedError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        let big = format!("{{\"results\": [], \"pad\": \"{}\"}}", "x".repeat(MAX_BODY_BYTES));
        let _mock = server
            .mock("GET", "/svc/topstories/v2/nyregion.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(big)
            .create_async()
            .await;

        let client = TopStoriesClient::new(&config(&server.url(), Some("k"))).unwrap();
        assert!(matches!(
            client.top_stories().await,
            Err(FeedError::TooLarge { limit: MAX_BODY_BYTES })
        ));
    }
}
