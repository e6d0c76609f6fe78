//! Generation request/result types and the publish receipt.

use crate::Platform;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A bounded request to a generation provider.
///
/// # Examples
///
/// ```
/// use vasari_core::GenerationRequest;
///
/// let request = GenerationRequest::builder()
///     .stage("summarize")
///     .prompt("Summarize this diary entry.")
///     .system("You write concise social posts.")
///     .model("small-1")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.stage, "summarize");
/// assert_eq!(request.max_tokens, 700);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into), default)]
pub struct GenerationRequest {
    /// Named generation purpose, used to select the routing list
    pub stage: String,
    /// User prompt
    pub prompt: String,
    /// System prompt
    pub system: String,
    /// Model identifier chosen by the router
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Output token ceiling
    pub max_tokens: u32,
    /// Per-call timeout
    pub timeout_seconds: u64,
    /// Caller-supplied metadata, logged with the call
    pub meta: JsonValue,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            stage: String::new(),
            prompt: String::new(),
            system: String::new(),
            model: String::new(),
            temperature: 0.4,
            max_tokens: 700,
            timeout_seconds: 30,
            meta: JsonValue::Null,
        }
    }
}

impl GenerationRequest {
    /// Start building a request.
    pub fn builder() -> GenerationRequestBuilder {
        GenerationRequestBuilder::default()
    }
}

/// The unified result of a successful generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Generated text
    pub text: String,
    /// Provider that served the call
    pub provider: String,
    /// Model that served the call
    pub model: String,
    /// Prompt tokens consumed
    pub tokens_in: u32,
    /// Completion tokens produced
    pub tokens_out: u32,
    /// Wall-clock latency
    pub latency_ms: u64,
}

/// What a platform publisher returns on success.
///
/// In dry-run mode the payload carries a simulated identifier and no
/// network call is made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishReceipt {
    /// Platform that accepted the content
    pub platform: Platform,
    /// Whether this was a simulated publish
    pub dry_run: bool,
    /// Platform response (or simulated receipt)
    pub payload: JsonValue,
}
