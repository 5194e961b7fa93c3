//! In-memory collaborators for exercising the solution flow.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use unfail_providers::{
    Article, ArticleSearch, ProviderError, TextGenerator, Video, VideoSearch,
};

use super::service::{Collaborators, SolutionService};

pub const FENCED_ADVICE: &str = r#"```json
{
  "solution": "Take two lessons that focus only on the manoeuvres you failed, then book the test at a quieter centre.",
  "keyword": "driving instruction",
  "youtubeKeyword": "driving lessons for beginners",
  "motivationalQuote": "Third time's the charm. Fourth time's a tradition.",
  "relatedPersonality": {
    "name": "Henry Ford",
    "story": "Ford's first two car companies failed. His third one did rather well."
  },
  "failureTitle": "Three Points, No Turn",
  "uselessLifeHack": "Never fail a driving test again by only ever walking."
}
```"#;

pub const ADVICE_WITHOUT_KEYWORDS: &str = r#"{
  "solution": "Send a late card with a very good joke.",
  "motivationalQuote": "Belated is just 'on time' in a different time zone.",
  "relatedPersonality": {"name": "Abraham Lincoln", "story": "Lost many elections before winning the big one."}
}"#;

#[derive(Default)]
struct Recorder {
    prompts: Mutex<Vec<String>>,
    article_keywords: Mutex<Vec<String>>,
    video_keywords: Mutex<Vec<String>>,
}

struct FakeText {
    reply: Option<String>,
    delay: Option<Duration>,
    recorder: Arc<Recorder>,
}

#[async_trait]
impl TextGenerator for FakeText {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.recorder.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply
            .clone()
            .ok_or(ProviderError::Timeout { provider: "gemini" })
    }
}

struct FakeArticles {
    results: Option<Vec<Article>>,
    /// Sleep this long, then fail the way a client timeout does.
    timeout_after: Option<Duration>,
    recorder: Arc<Recorder>,
}

#[async_trait]
impl ArticleSearch for FakeArticles {
    async fn search_articles(&self, keyword: &str) -> Result<Vec<Article>, ProviderError> {
        self.recorder
            .article_keywords
            .lock()
            .unwrap()
            .push(keyword.to_string());
        if let Some(delay) = self.timeout_after {
            tokio::time::sleep(delay).await;
            return Err(ProviderError::Timeout { provider: "newsapi" });
        }
        self.results.clone().ok_or(ProviderError::Status {
            provider: "newsapi",
            status: 500,
            body: "boom".to_string(),
        })
    }
}

struct FakeVideos {
    results: Option<Vec<Video>>,
    recorder: Arc<Recorder>,
}

#[async_trait]
impl VideoSearch for FakeVideos {
    async fn search_videos(&self, keyword: &str) -> Result<Vec<Video>, ProviderError> {
        self.recorder
            .video_keywords
            .lock()
            .unwrap()
            .push(keyword.to_string());
        self.results.clone().ok_or(ProviderError::Decode {
            provider: "youtube",
            message: "quota exceeded".to_string(),
        })
    }
}

/// Scripted collaborators that count their calls. `None` results fail.
pub struct Fakes {
    reply: Option<String>,
    reply_delay: Option<Duration>,
    articles: Option<Vec<Article>>,
    articles_timeout_after: Option<Duration>,
    videos: Option<Vec<Video>>,
    recorder: Arc<Recorder>,
}

impl Fakes {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            reply_delay: None,
            articles: Some(Vec::new()),
            articles_timeout_after: None,
            videos: Some(Vec::new()),
            recorder: Arc::default(),
        }
    }

    pub fn failing_generation() -> Self {
        Self {
            reply: None,
            ..Self::new("")
        }
    }

    pub fn with_slow_generation(mut self, delay: Duration) -> Self {
        self.reply_delay = Some(delay);
        self
    }

    pub fn with_timed_out_articles(mut self, after: Duration) -> Self {
        self.articles_timeout_after = Some(after);
        self
    }

    pub fn with_articles(mut self, articles: Vec<Article>) -> Self {
        self.articles = Some(articles);
        self
    }

    pub fn with_videos(mut self, videos: Vec<Video>) -> Self {
        self.videos = Some(videos);
        self
    }

    pub fn with_failing_articles(mut self) -> Self {
        self.articles = None;
        self
    }

    pub fn with_failing_searches(mut self) -> Self {
        self.articles = None;
        self.videos = None;
        self
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            text: Arc::new(FakeText {
                reply: self.reply.clone(),
                delay: self.reply_delay,
                recorder: self.recorder.clone(),
            }),
            articles: Arc::new(FakeArticles {
                results: self.articles.clone(),
                timeout_after: self.articles_timeout_after,
                recorder: self.recorder.clone(),
            }),
            videos: Arc::new(FakeVideos {
                results: self.videos.clone(),
                recorder: self.recorder.clone(),
            }),
        }
    }

    pub fn service(&self) -> SolutionService {
        SolutionService::new(self.collaborators())
    }

    /// (text-generation, article-search, video-search) call counts
    pub fn calls(&self) -> (usize, usize, usize) {
        (
            self.recorder.prompts.lock().unwrap().len(),
            self.recorder.article_keywords.lock().unwrap().len(),
            self.recorder.video_keywords.lock().unwrap().len(),
        )
    }

    pub fn last_prompt(&self) -> String {
        self.recorder
            .prompts
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_default()
    }

    pub fn article_keywords(&self) -> Vec<String> {
        self.recorder.article_keywords.lock().unwrap().clone()
    }

    pub fn video_keywords(&self) -> Vec<String> {
        self.recorder.video_keywords.lock().unwrap().clone()
    }
}

pub fn article(title: &str) -> Article {
    Article {
        title: title.to_string(),
        url: format!("https://news.example/{title}"),
        description: None,
        url_to_image: None,
        published_at: None,
        source: None,
    }
}

pub fn video(id: &str) -> Video {
    Video {
        id: id.to_string(),
        title: format!("Video {id}"),
        thumbnail: Some(format!("https://img.example/{id}.jpg")),
    }
}
