//! Anthropic Messages API client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::{debug, error, instrument};
use vasari_core::{GenerationRequest, GenerationResult};
use vasari_error::{ProviderError, ProviderErrorKind, VasariResult};
use vasari_interface::GenerationProvider;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const PROVIDER_NAME: &str = "anthropic";

/// Anthropic API client.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContentBlock>,
    #[serde(default)]
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

impl AnthropicClient {
    /// Creates a new Anthropic client with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        debug!("Creating new Anthropic client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Creates a client from the `ANTHROPIC_API_KEY` environment variable.
    pub fn from_env() -> VasariResult<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            ProviderError::new(ProviderErrorKind::MissingCredentials {
                provider: PROVIDER_NAME.to_string(),
                variable: "ANTHROPIC_API_KEY".to_string(),
            })
        })?;
        Ok(Self::new(api_key))
    }
}

#[async_trait]
impl GenerationProvider for AnthropicClient {
    #[instrument(skip(self, request), fields(model = %request.model, stage = %request.stage))]
    async fn generate(&self, request: &GenerationRequest) -> VasariResult<GenerationResult> {
        let body = json!({
            "model": request.model,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "system": request.system,
            "messages": [{"role": "user", "content": request.prompt}],
        });

        let start = Instant::now();
        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .timeout(Duration::from_secs(request.timeout_seconds))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to Anthropic API");
                ProviderError::new(ProviderErrorKind::Http(e.to_string()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, body = %message, "Anthropic API returned error");
            return Err(ProviderError::new(ProviderErrorKind::ApiStatus {
                provider: PROVIDER_NAME.to_string(),
                status: status.as_u16(),
                message,
            })
            .into());
        }

        let parsed: AnthropicResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse Anthropic response");
            ProviderError::new(ProviderErrorKind::Parse(e.to_string()))
        })?;
        let latency_ms = start.elapsed().as_millis() as u64;

        let text: String = parsed
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text.as_str())
            .collect();
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::EmptyCompletion(
                PROVIDER_NAME.to_string(),
            ))
            .into());
        }

        debug!(latency_ms, tokens_out = parsed.usage.output_tokens, "Anthropic call succeeded");
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
