//! Provider registry mapping route names to implementations.

use crate::{AnthropicClient, GeminiClient, OpenAiClient};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use vasari_interface::GenerationProvider;

/// Named registry of generation providers.
///
/// The router resolves route provider names through this registry, so a
/// deployment only registers the vendors it has credentials for; routes
/// naming unregistered providers are skipped with a recorded error.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<&'static str, Arc<dyn GenerationProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own name.
    pub fn register(&mut self, provider: Arc<dyn GenerationProvider>) {
        debug!(provider = provider.name(), "registering generation provider");
        self.providers.insert(provider.name(), provider);
    }

    /// Resolve a provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn GenerationProvider>> {
        self.providers.get(name).cloned()
    }

    /// Registered provider names, for diagnostics.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.providers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Build a registry from environment credentials, registering each of
    /// the three vendors whose API key is present.
    pub fn from_env() -> Self {
        let mut registry = Self::new();
        match OpenAiClient::from_env() {
            Ok(client) => registry.register(Arc::new(client)),
            Err(e) => debug!(error = %e, "openai not registered"),
        }
        match AnthropicClient::from_env() {
            Ok(client) => registry.register(Arc::new(client)),
            Err(e) => debug!(error = %e, "anthropic not registered"),
        }
        match GeminiClient::from_env() {
            Ok(client) => registry.register(Arc::new(client)),
            Err(e) => debug!(error = %e, "gemini not registered"),
        }
        registry
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}
