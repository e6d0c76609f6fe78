//! OpenAI Responses API client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::{debug, error, instrument};
use vasari_core::{GenerationRequest, GenerationResult};
use vasari_error::{ProviderError, ProviderErrorKind, VasariResult};
use vasari_interface::GenerationProvider;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/responses";
const PROVIDER_NAME: &str = "openai";

/// OpenAI API client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    output: Vec<OpenAiOutputItem>,
    #[serde(default)]
    usage: OpenAiUsage,
}

#[derive(Debug, Deserialize)]
struct OpenAiOutputItem {
    #[serde(default)]
    content: Vec<OpenAiContentItem>,
}

#[derive(Debug, Deserialize)]
struct OpenAiContentItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAiUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

impl OpenAiClient {
    /// Creates a new OpenAI client with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        debug!("Creating new OpenAI client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Creates a client from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> VasariResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ProviderError::new(ProviderErrorKind::MissingCredentials {
                provider: PROVIDER_NAME.to_string(),
                variable: "OPENAI_API_KEY".to_string(),
            })
        })?;
        Ok(Self::new(api_key))
    }
}

#[async_trait]
impl GenerationProvider for OpenAiClient {
    #[instrument(skip(self, request), fields(model = %request.model, stage = %request.stage))]
    async fn generate(&self, request: &GenerationRequest) -> VasariResult<GenerationResult> {
        let body = json!({
            "model": request.model,
            "temperature": request.temperature,
            "max_output_tokens": request.max_tokens,
            "input": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.prompt},
            ],
        });

        let start = Instant::now();
        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(request.timeout_seconds))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to OpenAI API");
                ProviderError::new(ProviderErrorKind::Http(e.to_string()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, body = %message, "OpenAI API returned error");
            return Err(ProviderError::new(ProviderErrorKind::ApiStatus {
                provider: PROVIDER_NAME.to_string(),
                status: status.as_u16(),
                message,
            })
            .into());
        }

        let parsed: OpenAiResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse OpenAI response");
            ProviderError::new(ProviderErrorKind::Parse(e.to_string()))
        })?;
        let latency_ms = start.elapsed().as_millis() as u64;

        let text: String = parsed
            .output
            .iter()
            .flat_map(|item| item.content.iter())
            .filter(|content| content.kind == "output_text")
            .map(|content| content.text.as_str())
            .collect();
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::EmptyCompletion(
                PROVIDER_NAME.to_string(),
            ))
            .into());
        }

        debug!(latency_ms, tokens_out = parsed.usage.output_tokens, "OpenAI call succeeded");
        Ok(GenerationResult {
            text,
            provider: PROVIDER_NAME.to_string(),
            model: request.model.clone(),
            tokens_in: parsed.usage.input_tokens,
            tokens_out: parsed.usage.output_tokens,
            latency_ms,
        })
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
