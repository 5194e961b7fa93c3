use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use unfail_providers::{Article, Video};

use crate::utils::json::{extract_json_object, ExtractError};

/// Request body of `POST /api/get-solution`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionRequest {
    #[serde(default)]
    pub user_input: Option<String>,
}

/// A real person who came back from a similar failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedPersonality {
    pub name: String,
    pub story: String,
}

/// Advice produced by the text-generation collaborator, after validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAdvice {
    pub solution: String,
    /// Search phrase for news articles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Tutorial-oriented search phrase for videos
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_keyword: Option<String>,
    pub motivational_quote: String,
    pub related_personality: RelatedPersonality,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub useless_life_hack: Option<String>,
}

/// Why the model's reply could not be turned into `GeneratedAdvice`.
#[derive(Error, Debug)]
pub enum AdviceError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected a JSON object at `{0}`")]
    NotAnObject(&'static str),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

impl GeneratedAdvice {
    /// Extract, parse and validate the advice object from raw model text.
    pub fn from_model_text(text: &str) -> Result<Self, AdviceError> {
        let object_text = extract_json_object(text)?;
        let value: Value = serde_json::from_str(object_text)?;
        Self::from_value(&value)
    }

    /// Validate a parsed JSON value field by field.
    pub fn from_value(value: &Value) -> Result<Self, AdviceError> {
        let root = value.as_object().ok_or(AdviceError::NotAnObject("$"))?;

        // Required fields are checked in declaration order.
        let solution = required(root, "solution", "solution")?;
        let motivational_quote = required(root, "motivationalQuote", "motivationalQuote")?;
        let personality = match root.get("relatedPersonality") {
            None | Some(Value::Null) => {
                return Err(AdviceError::MissingField("relatedPersonality"))
            }
            Some(value) => value
                .as_object()
                .ok_or(AdviceError::NotAnObject("relatedPersonality"))?,
        };

        Ok(Self {
            solution,
            keyword: optional(root, "keyword", "keyword")?,
            youtube_keyword: optional(root, "youtubeKeyword", "youtubeKeyword")?,
            motivational_quote,
            related_personality: RelatedPersonality {
                name: required(personality, "name", "relatedPersonality.name")?,
                story: required(personality, "story", "relatedPersonality.story")?,
            },
            failure_title: optional(root, "failureTitle", "failureTitle")?,
            useless_life_hack: optional(root, "uselessLifeHack", "uselessLifeHack")?,
        })
    }
}

/// A non-blank string field; `path` names it in errors.
fn required(
    object: &Map<String, Value>,
    key: &str,
    path: &'static str,
) -> Result<String, AdviceError> {
    optional(object, key, path)?.ok_or(AdviceError::MissingField(path))
}

/// Absent, null and blank strings all read as `None`. Other strings are kept as sent.
fn optional(
    object: &Map<String, Value>,
    key: &str,
    path: &'static str,
) -> Result<Option<String>, AdviceError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok((!text.trim().is_empty()).then(|| text.clone())),
        Some(_) => Err(AdviceError::WrongType {
            field: path,
            expected: "string",
        }),
    }
}

/// Success body: advice fields flattened alongside the enrichment lists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionPayload {
    #[serde(flatten)]
    pub advice: GeneratedAdvice,
    pub articles: Vec<Article>,
    pub youtube_videos: Vec<Video>,
}
