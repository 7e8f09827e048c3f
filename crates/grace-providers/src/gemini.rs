//! Google Gemini API provider.
//!
//! Calls the Gemini `generateContent` endpoint. Auth via URL query param.

use async_trait::async_trait;
use grace_core::{
    config::GeminiConfig,
    context::Context,
    error::GraceError,
    message::{Completion, CompletionMetadata},
    traits::Provider,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Google Gemini API provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create from config values.
    pub fn from_config(cfg: &GeminiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!("gemini: failed to build http client ({e}), using defaults");
                reqwest::Client::new()
            });
        Self {
            client,
            api_key: cfg.api_key.trim().to_string(),
            model: cfg.model.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    total_token_count: u64,
}

/// Gemini speaks of "model" where the rest of Grace says "assistant".
fn gemini_role(role: &str) -> &'static str {
    if role == "assistant" {
        "model"
    } else {
        "user"
    }
}

fn build_request(context: &Context) -> GeminiRequest {
    let (system, api_messages) = context.to_api_messages();

    let system_instruction = if system.is_empty() {
        None
    } else {
        Some(GeminiContent {
            role: None,
            parts: vec![GeminiPart { text: system }],
        })
    };

    let contents = api_messages
        .iter()
        .map(|m| GeminiContent {
            role: Some(gemini_role(&m.role).to_string()),
            parts: vec![GeminiPart {
                text: m.content.clone(),
            }],
        })
        .collect();

    let generation_config = if context.temperature.is_some() || context.response_schema.is_some()
    {
        Some(GenerationConfig {
            temperature: context.temperature,
            response_mime_type: context
                .response_schema
                .as_ref()
                .map(|_| "application/json"),
            response_schema: context.response_schema.clone(),
        })
    } else {
        None
    };

    GeminiRequest {
        contents,
        system_instruction,
        generation_config,
    }
}

/// Map a non-success HTTP answer to an error. A refused key gets its own
/// variant so callers can tell the user to fix it.
fn failure_error(status: reqwest::StatusCode, body: &str) -> GraceError {
    let key_refused = status == reqwest::StatusCode::UNAUTHORIZED
        || status == reqwest::StatusCode::FORBIDDEN
        || (status == reqwest::StatusCode::BAD_REQUEST
            && (body.contains("API_KEY_INVALID") || body.contains("API key not valid")));
    if key_refused {
        GraceError::CredentialRejected(format!("gemini returned {status}"))
    } else {
        GraceError::Provider(format!("gemini returned {status}: {body}"))
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn complete(&self, context: &Context) -> Result<Completion, GraceError> {
        let effective_model = context.model.as_deref().unwrap_or(&self.model);
        let start = Instant::now();
        let body = build_request(context);

        let url = format!(
            "{}/models/{effective_model}:generateContent?key={}",
            self.base_url, self.api_key
        );
        debug!("gemini: POST models/{effective_model}:generateContent");

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GraceError::Provider(format!("gemini request failed: {}", e.without_url())))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(failure_error(status, &text));
        }

        let parsed: GeminiResponse = resp.json().await.map_err(|e| {
            GraceError::Provider(format!("gemini: failed to parse response: {}", e.without_url()))
        })?;

        let text = parsed
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let tokens = parsed.usage_metadata.as_ref().map(|u| u.total_token_count);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        Ok(Completion {
            text,
            metadata: CompletionMetadata {
                provider_used: "gemini".to_string(),
                tokens_used: tokens,
                processing_time_ms: elapsed_ms,
                model: Some(effective_model.to_string()),
            },
        })
    }

    async fn is_available(&self) -> bool {
        if self.api_key.is_empty() {
            warn!("gemini: no API key configured");
            return false;
        }
        let url = format!("{}/models?key={}", self.base_url, self.api_key);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!("gemini not available: {}", e.without_url());
                false
            }
        }
    }
}
