use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use thiserror::Error;
use unfail_http::AppError;
use unfail_kernel::settings::Settings;
use unfail_providers::{
    Article, ArticleSearch, GeminiClient, NewsApiClient, ProviderError, TextGenerator, Video,
    VideoSearch, YoutubeClient,
};

use super::models::{AdviceError, GeneratedAdvice, SolutionPayload};
use super::prompt::build_prompt;

pub const MISSING_INPUT_MESSAGE: &str = "User input is required";
pub const STRUCTURED_RESPONSE_MESSAGE: &str =
    "The AI failed to provide a structured response. Please try again.";

/// Request-level failures. Enrichment failures never surface here.
#[derive(Error, Debug)]
pub enum SolveError {
    #[error("User input is required")]
    MissingInput,

    #[error("text generation failed: {0}")]
    Generation(#[source] ProviderError),

    #[error("The AI failed to provide a structured response. Please try again.")]
    StructuredResponse(#[source] AdviceError),
}

impl From<SolveError> for AppError {
    fn from(error: SolveError) -> Self {
        match error {
            SolveError::MissingInput => AppError::bad_request(MISSING_INPUT_MESSAGE),
            SolveError::StructuredResponse(_) => {
                AppError::upstream("structured_response", STRUCTURED_RESPONSE_MESSAGE)
            }
            SolveError::Generation(_) => AppError::Internal(anyhow::Error::new(error)),
        }
    }
}

/// The three external services a solution is built from.
#[derive(Clone)]
pub struct Collaborators {
    pub text: Arc<dyn TextGenerator>,
    pub articles: Arc<dyn ArticleSearch>,
    pub videos: Arc<dyn VideoSearch>,
}

impl Collaborators {
    /// Build the vendor-backed clients once from configuration.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self {
            text: Arc::new(
                GeminiClient::new(&settings.gemini).context("failed to build Gemini client")?,
            ),
            articles: Arc::new(
                NewsApiClient::new(&settings.news).context("failed to build NewsAPI client")?,
            ),
            videos: Arc::new(
                YoutubeClient::new(&settings.youtube).context("failed to build YouTube client")?,
            ),
        })
    }
}

/// Turns a user's description of a failure into advice plus related links.
pub struct SolutionService {
    collaborators: Collaborators,
}

impl SolutionService {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    pub async fn solve(&self, user_input: &str) -> Result<SolutionPayload, SolveError> {
        let user_input = user_input.trim();
        if user_input.is_empty() {
            return Err(SolveError::MissingInput);
        }

        tracing::info!(input_chars = user_input.chars().count(), "solution requested");

        let prompt = build_prompt(user_input);
        let started = Instant::now();
        let raw = self
            .collaborators
            .text
            .generate(&prompt)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "text generation failed");
                SolveError::Generation(e)
            })?;
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "text generation complete"
        );

        let advice = GeneratedAdvice::from_model_text(&raw).map_err(|e| {
            tracing::error!(error = %e, raw = %raw, "failed to parse model response");
            SolveError::StructuredResponse(e)
        })?;

        let (articles, youtube_videos) = tokio::join!(
            self.find_articles(advice.keyword.as_deref()),
            self.find_videos(advice.youtube_keyword.as_deref()),
        );

        Ok(SolutionPayload {
            advice,
            articles,
            youtube_videos,
        })
    }

    async fn find_articles(&self, keyword: Option<&str>) -> Vec<Article> {
        let Some(keyword) = keyword.map(str::trim) else {
            return Vec::new();
        };

        match self.collaborators.articles.search_articles(keyword).await {
            Ok(articles) => articles,
            Err(e) => {
                tracing::warn!(channel = "articles", provider = e.provider(), error = %e, "enrichment unavailable");
                Vec::new()
            }
        }
    }

    async fn find_videos(&self, keyword: Option<&str>) -> Vec<Video> {
        let Some(keyword) = keyword.map(str::trim) else {
            return Vec::new();
        };

        match self.collaborators.videos.search_videos(keyword).await {
            Ok(videos) => videos,
            Err(e) => {
                tracing::warn!(channel = "videos", provider = e.provider(), error = %e, "enrichment unavailable");
                Vec::new()
            }
        }
    }
}
