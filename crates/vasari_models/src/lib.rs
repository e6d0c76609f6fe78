//! Generation provider integrations and stage routing for Vasari.
//!
//! Three vendor HTTP APIs are wrapped behind the
//! [`GenerationProvider`](vasari_interface::GenerationProvider) trait:
//! OpenAI (Responses API), Anthropic (Messages API), and Google Gemini
//! (generateContent). The [`StageRouter`] tries an ordered ladder of
//! `provider:model` routes per stage, logging cost and usage for the first
//! success and escalating to the next route on failure.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod anthropic;
mod gemini;
mod openai;
mod registry;
mod router;

pub use anthropic::AnthropicClient;
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use registry::ProviderRegistry;
pub use router::StageRouter;
