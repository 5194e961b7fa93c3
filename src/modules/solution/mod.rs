pub mod models;
pub mod prompt;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use unfail_http::AppError;
use unfail_kernel::{InitCtx, Module};

use crate::utils;
use models::{SolutionPayload, SolutionRequest};
pub use service::{Collaborators, SolutionService, SolveError};

/// Serves `POST /api/get-solution`
pub struct SolutionModule {
    service: Arc<SolutionService>,
}

impl SolutionModule {
    pub fn new(service: Arc<SolutionService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for SolutionModule {
    fn name(&self) -> &'static str {
        "get-solution"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let prefix = utils::log_prefix(self.name());
        tracing::info!(
            module = self.name(),
            %prefix,
            environment = ?ctx.settings.environment,
            model = %ctx.settings.gemini.model,
            "solution module initialized"
        );
        for (provider, key) in [
            ("gemini", &ctx.settings.gemini.api_key),
            ("newsapi", &ctx.settings.news.api_key),
            ("youtube", &ctx.settings.youtube.api_key),
        ] {
            if key.is_empty() {
                tracing::warn!(provider, "no API key configured; calls will be rejected upstream");
            }
        }
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", post(get_solution))
            .route("/health", get(health_check))
            .with_state(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Turn a failure into advice, news and videos",
                        "tags": ["Solution"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/SolutionRequest"}
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Advice with best-effort articles and videos",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/SolutionPayload"}
                                    }
                                }
                            },
                            "400": {
                                "description": "User input is required",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            },
                            "500": {
                                "description": "Generation or structured-response failure",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            }
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Solution module health check",
                        "tags": ["Solution"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": {"text/plain": {"schema": {"type": "string"}}}
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "SolutionRequest": {
                        "type": "object",
                        "properties": {"userInput": {"type": "string"}},
                        "required": ["userInput"]
                    },
                    "RelatedPersonality": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "story": {"type": "string"}
                        },
                        "required": ["name", "story"]
                    },
                    "Article": {
                        "type": "object",
                        "properties": {
                            "title": {"type": "string"},
                            "url": {"type": "string", "format": "uri"},
                            "description": {"type": "string"},
                            "urlToImage": {"type": "string", "format": "uri"},
                            "publishedAt": {"type": "string", "format": "date-time"},
                            "source": {
                                "type": "object",
                                "properties": {
                                    "id": {"type": "string"},
                                    "name": {"type": "string"}
                                }
                            }
                        },
                        "required": ["title", "url"]
                    },
                    "Video": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "string"},
                            "title": {"type": "string"},
                            "thumbnail": {"type": "string", "format": "uri"}
                        },
                        "required": ["id", "title"]
                    },
                    "SolutionPayload": {
                        "type": "object",
                        "properties": {
                            "solution": {"type": "string"},
                            "keyword": {"type": "string"},
                            "youtubeKeyword": {"type": "string"},
                            "motivationalQuote": {"type": "string"},
                            "relatedPersonality": {"$ref": "#/components/schemas/RelatedPersonality"},
                            "failureTitle": {"type": "string"},
                            "uselessLifeHack": {"type": "string"},
                            "articles": {
                                "type": "array",
                                "items": {"$ref": "#/components/schemas/Article"}
                            },
                            "youtubeVideos": {
                                "type": "array",
                                "items": {"$ref": "#/components/schemas/Video"}
                            }
                        },
                        "required": [
                            "solution",
                            "motivationalQuote",
                            "relatedPersonality",
                            "articles",
                            "youtubeVideos"
                        ]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "solution module stopped");
        Ok(())
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "get-solution module is healthy"
}

async fn get_solution(
    State(service): State<Arc<SolutionService>>,
    request: Result<Json<SolutionRequest>, JsonRejection>,
) -> Result<Json<SolutionPayload>, AppError> {
    let Json(request) = request.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let user_input = request.user_input.unwrap_or_default();

    let payload = service.solve(&user_input).await?;
    Ok(Json(payload))
}

/// Create the module around an already-built service
pub fn create_module(service: Arc<SolutionService>) -> Arc<dyn Module> {
    Arc::new(SolutionModule::new(service))
}
