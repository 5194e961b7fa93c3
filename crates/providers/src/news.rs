//! NewsAPI `everything` client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, Duration, OffsetDateTime};
use unfail_kernel::settings::NewsSettings;

use crate::{http_client, read_json, ArticleSearch, ProviderError};

const PROVIDER: &str = "newsapi";

/// A news item. Only `title` and `url` are guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_to_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ArticleSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Option<Vec<RawArticle>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url_to_image: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    source: Option<ArticleSource>,
}

impl RawArticle {
    fn into_article(self) -> Option<Article> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let url = self.url.filter(|u| !u.trim().is_empty())?;
        Some(Article {
            title,
            url,
            description: self.description,
            url_to_image: self.url_to_image,
            published_at: self.published_at,
            source: self.source,
        })
    }
}

/// Article search backed by NewsAPI.
pub struct NewsApiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    page_size: u32,
    lookback_days: u32,
    language: Option<String>,
    sort_by: String,
}

impl NewsApiClient {
    pub fn new(settings: &NewsSettings) -> Result<Self, ProviderError> {
        Ok(Self {
            http: http_client(PROVIDER, settings.timeout_ms)?,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            page_size: settings.page_size,
            lookback_days: settings.lookback_days,
            language: settings.language.clone().filter(|l| !l.is_empty()),
            sort_by: settings.sort_by.clone(),
        })
    }

    /// Lower bound of the search window, `lookback_days` before `today`, as `YYYY-MM-DD`.
    pub fn from_date(&self, today: Date) -> Result<String, ProviderError> {
        let from = today
            .checked_sub(Duration::days(i64::from(self.lookback_days)))
            .unwrap_or(Date::MIN);
        from.format(format_description!("[year]-[month]-[day]"))
            .map_err(|e| ProviderError::InvalidRequest {
                provider: PROVIDER,
                message: e.to_string(),
            })
    }

    fn query(&self, keyword: &str, today: Date) -> Result<Vec<(&'static str, String)>, ProviderError> {
        let mut query = vec![
            ("q", keyword.to_string()),
            ("from", self.from_date(today)?),
            ("sortBy", self.sort_by.clone()),
            ("pageSize", self.page_size.to_string()),
        ];
        if let Some(language) = &self.language {
            query.push(("language", language.clone()));
        }
        Ok(query)
    }
}

#[async_trait]
impl ArticleSearch for NewsApiClient {
    async fn search_articles(&self, keyword: &str) -> Result<Vec<Article>, ProviderError> {
        let today = OffsetDateTime::now_utc().date();
        let query = self.query(keyword, today)?;
        tracing::debug!(provider = PROVIDER, keyword, "searching articles");

        let response = self
            .http
            .get(format!("{}/v2/everything", self.base_url))
            .header("X-Api-Key", &self.api_key)
            .query(&query)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, e))?;

        let body: EverythingResponse = read_json(PROVIDER, response).await?;

        Ok(body
            .articles
            .unwrap_or_default()
            .into_iter()
            .filter_map(RawArticle::into_article)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_vendor;
    use axum::{
        extract::{Query, State},
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use time::macros::date;

    type Captured = Arc<Mutex<Option<(HashMap<String, String>, Option<String>)>>>;

    fn settings(base_url: String) -> NewsSettings {
        NewsSettings {
            api_key: "news-key".to_string(),
            base_url,
            ..NewsSettings::default()
        }
    }

    #[test]
    fn from_date_is_four_weeks_back() {
        let client = NewsApiClient::new(&settings("http://unused".to_string())).unwrap();
        assert_eq!(client.from_date(date!(2024 - 03 - 10)).unwrap(), "2024-02-11");
        assert_eq!(client.from_date(date!(2025 - 01 - 05)).unwrap(), "2024-12-08");
    }

    #[test]
    fn empty_language_is_not_sent() {
        let mut settings = settings("http://unused".to_string());
        settings.language = Some(String::new());
        let client = NewsApiClient::new(&settings).unwrap();

        let query = client.query("career", date!(2024 - 03 - 10)).unwrap();
        assert!(query.iter().all(|(name, _)| *name != "language"));
    }

    #[tokio::test]
    async fn sends_query_and_maps_articles() {
        let captured: Captured = Arc::default();
        let router = Router::new()
            .route(
                "/v2/everything",
                get(
                    |State(captured): State<Captured>,
                     headers: HeaderMap,
                     Query(params): Query<HashMap<String, String>>| async move {
                        let key = headers
                            .get("x-api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        *captured.lock().unwrap() = Some((params, key));
                        Json(json!({
                            "status": "ok",
                            "totalResults": 3,
                            "articles": [
                                {
                                    "source": {"id": null, "name": "Road Weekly"},
                                    "title": "Learner drivers rejoice",
                                    "url": "https://news.example/a",
                                    "publishedAt": "2024-03-01T10:00:00Z"
                                },
                                {"title": "No link here"},
                                {"title": "Second", "url": "https://news.example/b"}
                            ]
                        }))
                    },
                ),
            )
            .with_state(captured.clone());
        let base = spawn_vendor(router).await;

        let client = NewsApiClient::new(&settings(base)).unwrap();
        let articles = client.search_articles("driving instruction").await.unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Learner drivers rejoice");
        assert_eq!(
            articles[0].source.as_ref().and_then(|s| s.name.as_deref()),
            Some("Road Weekly")
        );
        assert_eq!(articles[1].url, "https://news.example/b");

        let (params, key) = captured.lock().unwrap().clone().unwrap();
        assert_eq!(params["q"], "driving instruction");
        assert_eq!(params["sortBy"], "publishedAt");
        assert_eq!(params["pageSize"], "5");
        assert_eq!(params["language"], "en");
        assert_eq!(params["from"].len(), 10);
        assert!(!params.contains_key("apiKey"));
        assert_eq!(key.as_deref(), Some("news-key"));
    }

    #[tokio::test]
    async fn absent_articles_field_is_empty() {
        let router = Router::new().route(
            "/v2/everything",
            get(|| async { Json(json!({"status": "ok"})) }),
        );
        let base = spawn_vendor(router).await;

        let client = NewsApiClient::new(&settings(base)).unwrap();
        assert!(client.search_articles("x").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn vendor_error_status_is_reported() {
        let router = Router::new().route(
            "/v2/everything",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"status": "error", "code": "apiKeyInvalid"})),
                )
            }),
        );
        let base = spawn_vendor(router).await;

        let client = NewsApiClient::new(&settings(base)).unwrap();
        let err = client.search_articles("x").await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 401, .. }));
        assert_eq!(err.provider(), "newsapi");
    }

    #[tokio::test]
    async fn slow_vendor_times_out() {
        let router = Router::new().route(
            "/v2/everything",
            get(|| async {
                tokio::time::sleep(std::time::Duration::from_millis(500)).await;
                Json(json!({"status": "ok", "articles": []}))
            }),
        );
        let base = spawn_vendor(router).await;

        let mut settings = settings(base);
        settings.timeout_ms = 50;
        let client = NewsApiClient::new(&settings).unwrap();
        let err = client.search_articles("x").await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout { provider: "newsapi" }));
    }

    #[tokio::test]
    async fn malformed_payload_is_a_decode_error() {
        let router = Router::new().route("/v2/everything", get(|| async { "<html>oops</html>" }));
        let base = spawn_vendor(router).await;

        let client = NewsApiClient::new(&settings(base)).unwrap();
        let err = client.search_articles("x").await.unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }));
    }
}
