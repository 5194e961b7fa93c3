use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "UNFAIL_ENV";
const CONFIG_DIR_ENV: &str = "UNFAIL_CONFIG_DIR";
const ENV_PREFIX: &str = "UNFAIL";

/// Plain credential variables honoured on top of the layered configuration.
const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";
const NEWS_API_KEY_ENV: &str = "NEWS_API_KEY";
const YOUTUBE_API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub gemini: GeminiSettings,
    #[serde(default)]
    pub news: NewsSettings,
    #[serde(default)]
    pub youtube: YoutubeSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay,
    /// prefixed environment variables and finally the plain credential variables.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                std::env::current_dir()
                    .map(|cwd| cwd.join("config"))
                    .unwrap_or_else(|_| PathBuf::from("config"))
            });

        let mut settings = Self::load_from(&config_dir, &environment)?;
        settings.apply_credential_overrides(|name| std::env::var(name).ok());

        Ok(settings)
    }

    /// Load configuration from `config_dir` for the named environment.
    pub fn load_from(config_dir: &std::path::Path, environment: &str) -> anyhow::Result<Self> {
        let parsed_environment = Environment::parse(environment)?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = parsed_environment;

        Ok(settings)
    }

    /// Replace vendor credentials with the conventional plain variables when set.
    pub fn apply_credential_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());

        if let Some(key) = non_empty(GOOGLE_API_KEY_ENV) {
            self.gemini.api_key = key;
        }
        if let Some(key) = non_empty(NEWS_API_KEY_ENV) {
            self.news.api_key = key;
        }
        if let Some(key) = non_empty(YOUTUBE_API_KEY_ENV) {
            self.youtube.api_key = key;
        }
    }

    /// Settings as JSON with every credential masked, for display.
    pub fn redacted(&self) -> serde_json::Value {
        serde_json::json!({
            "environment": format!("{:?}", self.environment).to_lowercase(),
            "server": {
                "host": self.server.host,
                "port": self.server.port,
                "request_timeout_ms": self.server.request_timeout_ms,
            },
            "telemetry": {
                "log_format": format!("{:?}", self.telemetry.log_format).to_lowercase(),
            },
            "gemini": {
                "api_key": redact(&self.gemini.api_key),
                "model": self.gemini.model,
                "base_url": self.gemini.base_url,
                "timeout_ms": self.gemini.timeout_ms,
            },
            "news": {
                "api_key": redact(&self.news.api_key),
                "base_url": self.news.base_url,
                "page_size": self.news.page_size,
                "lookback_days": self.news.lookback_days,
                "language": self.news.language,
                "sort_by": self.news.sort_by,
                "timeout_ms": self.news.timeout_ms,
            },
            "youtube": {
                "api_key": redact(&self.youtube.api_key),
                "base_url": self.youtube.base_url,
                "max_results": self.youtube.max_results,
                "relevance_language": self.youtube.relevance_language,
                "timeout_ms": self.youtube.timeout_ms,
            },
        })
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        30000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Text-generation collaborator (Gemini `generateContent`).
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "GeminiSettings::default_model")]
    pub model: String,
    #[serde(default = "GeminiSettings::default_base_url")]
    pub base_url: String,
    #[serde(default = "GeminiSettings::default_timeout_ms")]
    pub timeout_ms: u64,
}

impl GeminiSettings {
    fn default_model() -> String {
        "gemini-1.5-pro-latest".to_string()
    }

    fn default_base_url() -> String {
        "https://generativelanguage.googleapis.com".to_string()
    }

    fn default_timeout_ms() -> u64 {
        20000
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: Self::default_model(),
            base_url: Self::default_base_url(),
            timeout_ms: Self::default_timeout_ms(),
        }
    }
}

/// Article-search collaborator (NewsAPI `everything`).
#[derive(Debug, Clone, Deserialize)]
pub struct NewsSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "NewsSettings::default_base_url")]
    pub base_url: String,
    #[serde(default = "NewsSettings::default_page_size")]
    pub page_size: u32,
    #[serde(default = "NewsSettings::default_lookback_days")]
    pub lookback_days: u32,
    #[serde(default = "NewsSettings::default_language")]
    pub language: Option<String>,
    #[serde(default = "NewsSettings::default_sort_by")]
    pub sort_by: String,
    #[serde(default = "NewsSettings::default_timeout_ms")]
    pub timeout_ms: u64,
}

impl NewsSettings {
    fn default_base_url() -> String {
        "https://newsapi.org".to_string()
    }

    fn default_page_size() -> u32 {
        5
    }

    fn default_lookback_days() -> u32 {
        28
    }

    fn default_language() -> Option<String> {
        Some("en".to_string())
    }

    fn default_sort_by() -> String {
        "publishedAt".to_string()
    }

    fn default_timeout_ms() -> u64 {
        5000
    }
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: Self::default_base_url(),
            page_size: Self::default_page_size(),
            lookback_days: Self::default_lookback_days(),
            language: Self::default_language(),
            sort_by: Self::default_sort_by(),
            timeout_ms: Self::default_timeout_ms(),
        }
    }
}

/// Video-search collaborator (YouTube Data API `search`).
#[derive(Debug, Clone, Deserialize)]
pub struct YoutubeSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "YoutubeSettings::default_base_url")]
    pub base_url: String,
    #[serde(default = "YoutubeSettings::default_max_results")]
    pub max_results: u32,
    #[serde(default = "YoutubeSettings::default_relevance_language")]
    pub relevance_language: String,
    #[serde(default = "YoutubeSettings::default_timeout_ms")]
    pub timeout_ms: u64,
}

impl YoutubeSettings {
    fn default_base_url() -> String {
        "https://www.googleapis.com".to_string()
    }

    fn default_max_results() -> u32 {
        3
    }

    fn default_relevance_language() -> String {
        "en".to_string()
    }

    fn default_timeout_ms() -> u64 {
        5000
    }
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: Self::default_base_url(),
            max_results: Self::default_max_results(),
            relevance_language: Self::default_relevance_language(),
            timeout_ms: Self::default_timeout_ms(),
        }
    }
}
