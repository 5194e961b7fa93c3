//! YouTube Data API `search` client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use unfail_kernel::settings::YoutubeSettings;

use crate::{http_client, read_json, ProviderError, VideoSearch};

const PROVIDER: &str = "youtube";

/// A video result reduced to what a card needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Option<Vec<SearchItem>>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: Option<ItemId>,
    #[serde(default)]
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemId {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    #[serde(default)]
    high: Option<Thumbnail>,
    #[serde(default)]
    medium: Option<Thumbnail>,
    #[serde(default)]
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl Thumbnails {
    fn best(self) -> Option<String> {
        self.high
            .or(self.medium)
            .or(self.default)
            .map(|thumbnail| thumbnail.url)
    }
}

impl SearchItem {
    fn into_video(self) -> Option<Video> {
        let id = self.id?.video_id.filter(|id| !id.is_empty())?;
        let snippet = self.snippet?;
        let title = decode_entities(&snippet.title?);
        Some(Video {
            id,
            title,
            thumbnail: snippet.thumbnails.and_then(Thumbnails::best),
        })
    }
}

/// Snippet titles arrive HTML-escaped.
fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Video search backed by the YouTube Data API.
pub struct YoutubeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    max_results: u32,
    relevance_language: String,
}

impl YoutubeClient {
    pub fn new(settings: &YoutubeSettings) -> Result<Self, ProviderError> {
        Ok(Self {
            http: http_client(PROVIDER, settings.timeout_ms)?,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            max_results: settings.max_results,
            relevance_language: settings.relevance_language.clone(),
        })
    }
}

#[async_trait]
impl VideoSearch for YoutubeClient {
    async fn search_videos(&self, keyword: &str) -> Result<Vec<Video>, ProviderError> {
        let query = [
            ("part", "snippet".to_string()),
            ("q", keyword.to_string()),
            ("type", "video".to_string()),
            ("maxResults", self.max_results.to_string()),
            ("relevanceLanguage", self.relevance_language.clone()),
        ];

        tracing::debug!(provider = PROVIDER, keyword, "searching videos");

        let response = self
            .http
            .get(format!("{}/youtube/v3/search", self.base_url))
            .header("x-goog-api-key", &self.api_key)
            .query(&query)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, e))?;

        let body: SearchResponse = read_json(PROVIDER, response).await?;

        Ok(body
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(SearchItem::into_video)
            .collect())
    }
}
