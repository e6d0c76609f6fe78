//! Google Gemini generateContent client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::{debug, error, instrument};
use vasari_core::{GenerationRequest, GenerationResult};
use vasari_error::{ProviderError, ProviderErrorKind, VasariResult};
use vasari_interface::GenerationProvider;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const PROVIDER_NAME: &str = "gemini";

/// Google Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default, rename = "usageMetadata")]
    usage: GeminiUsage,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: GeminiContent,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiUsage {
    #[serde(default, rename = "promptTokenCount")]
    prompt_tokens: u32,
    #[serde(default, rename = "candidatesTokenCount")]
    candidate_tokens: u32,
}

impl GeminiClient {
    /// Creates a new Gemini client with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        debug!("Creating new Gemini client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Creates a client from `GEMINI_API_KEY`, falling back to
    /// `GOOGLE_API_KEY`.
    pub fn from_env() -> VasariResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| {
                ProviderError::new(ProviderErrorKind::MissingCredentials {
                    provider: PROVIDER_NAME.to_string(),
                    variable: "GEMINI_API_KEY".to_string(),
                })
            })?;
        Ok(Self::new(api_key))
    }
}

#[async_trait]
impl GenerationProvider for GeminiClient {
    #[instrument(skip(self, request), fields(model = %request.model, stage = %request.stage))]
    async fn generate(&self, request: &GenerationRequest) -> VasariResult<GenerationResult> {
        let url = format!(
            "{GEMINI_API_BASE}/{}:generateContent?key={}",
            request.model, self.api_key
        );
        let body = json!({
            "system_instruction": {"parts": [{"text": request.system}]},
            "contents": [{"parts": [{"text": request.prompt}]}],
            "generationConfig": {
                "temperature": request.temperature,
                "maxOutputTokens": request.max_tokens,
            },
        });

        let start = Instant::now();
        let response = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(request.timeout_seconds))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to Gemini API");
                ProviderError::new(ProviderErrorKind::Http(e.to_string()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, body = %message, "Gemini API returned error");
            return Err(ProviderError::new(ProviderErrorKind::ApiStatus {
                provider: PROVIDER_NAME.to_string(),
                status: status.as_u16(),
                message,
            })
            .into());
        }

        let parsed: GeminiResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse Gemini response");
            ProviderError::new(ProviderErrorKind::Parse(e.to_string()))
        })?;
        let latency_ms = start.elapsed().as_millis() as u64;

        let text: String = parsed
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect()
            })
            .unwrap_or_default();
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::EmptyCompletion(
                PROVIDER_NAME.to_string(),
            ))
            .into());
        }

        debug!(latency_ms, tokens_out = parsed.usage.candidate_tokens, "Gemini call succeeded");
        Ok(GenerationResult {
            text,
            provider: PROVIDER_NAME.to_string(),
            model: request.model.clone(),
            tokens_in: parsed.usage.prompt_tokens,
            tokens_out: parsed.usage.candidate_tokens,
            latency_ms,
        })
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
