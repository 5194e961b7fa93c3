//! External collaborators consulted while building a solution: a text
//! generator and two keyword searches, each behind a trait so callers can
//! substitute fakes.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

pub mod error;
pub mod gemini;
pub mod news;
pub mod youtube;

pub use error::ProviderError;
pub use gemini::GeminiClient;
pub use news::{Article, ArticleSource, NewsApiClient};
pub use youtube::{Video, YoutubeClient};

/// Hosted large-language-model endpoint: one prompt in, one text blob out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Keyword search returning recent news-like items.
#[async_trait]
pub trait ArticleSearch: Send + Sync {
    async fn search_articles(&self, keyword: &str) -> Result<Vec<Article>, ProviderError>;
}

/// Keyword search returning video items.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search_videos(&self, keyword: &str) -> Result<Vec<Video>, ProviderError>;
}

/// Longest vendor error body kept in a `ProviderError::Status`.
const MAX_ERROR_BODY: usize = 512;

pub(crate) fn http_client(
    provider: &'static str,
    timeout_ms: u64,
) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .user_agent(concat!("unfail/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProviderError::from_reqwest(provider, e))
}

/// Check the status and decode a JSON body, keeping a snippet of the body on failure.
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::from_reqwest(provider, e))?;

    if !status.is_success() {
        let mut body = body;
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| ProviderError::Decode {
        provider,
        message: e.to_string(),
    })
}
