//! Stage-based provider routing with ordered fallback.

use crate::ProviderRegistry;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};
use vasari_core::{GenerationRequest, GenerationResult, NewLlmCall, Route, VasariConfig};
use vasari_error::{RouterError, RouterErrorKind, VasariResult};
use vasari_interface::Store;

/// Routes generation requests through an ordered `provider:model` ladder
/// per stage.
///
/// The ladder gives cheap models first priority per stage with automatic
/// escalation to alternate vendors on outage or quota errors; callers never
/// need per-provider knowledge. The first route that succeeds wins: its
/// usage and estimated cost are appended to the call log and no further
/// routes are tried. If every route fails, the aggregate error carries all
/// per-route failure messages.
#[derive(Debug, Clone, Default)]
pub struct StageRouter {
    registry: ProviderRegistry,
    overrides: HashMap<String, Vec<String>>,
}

impl StageRouter {
    /// Create a router over a provider registry.
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            overrides: HashMap::new(),
        }
    }

    /// Supply a routing table checked before the configuration's table
    /// (e.g. a per-deployment models file).
    pub fn with_overrides(mut self, overrides: HashMap<String, Vec<String>>) -> Self {
        self.overrides = overrides;
        self
    }

    fn routes_for_stage(&self, config: &VasariConfig, stage: &str) -> Vec<String> {
        if let Some(routes) = self.overrides.get(stage)
            && !routes.is_empty()
        {
            return routes.clone();
        }
        config.routing.get(stage).cloned().unwrap_or_default()
    }

    /// Generate text for a stage, walking the route ladder.
    #[instrument(skip(self, store, config, prompt, system, meta))]
    pub async fn generate(
        &self,
        store: &dyn Store,
        config: &VasariConfig,
        stage: &str,
        prompt: &str,
        system: &str,
        meta: JsonValue,
    ) -> VasariResult<GenerationResult> {
        let routes = self.routes_for_stage(config, stage);
        if routes.is_empty() {
            return Err(RouterError::new(RouterErrorKind::NoRoutes(stage.to_string())).into());
        }

        let mut errors: Vec<String> = Vec::new();
        for route_str in &routes {
            let route: Route = match route_str.parse() {
                Ok(route) => route,
                Err(e) => {
                    errors.push(format!("{route_str}: {}", e.kind));
                    continue;
                }
            };
            let Some(provider) = self.registry.get(&route.provider) else {
                errors.push(format!("{route_str}: provider not available"));
                continue;
            };

            let request = GenerationRequest {
                stage: stage.to_string(),
                prompt: prompt.to_string(),
                system: system.to_string(),
                model: route.model.clone(),
                temperature: config.llm.temperature,
                max_tokens: config.llm.max_tokens,
                timeout_seconds: config.llm.timeout_seconds,
                meta: meta.clone(),
            };

            match provider.generate(&request).await {
                Ok(result) => {
                    let cost_usd = config
                        .price_for(&route.pricing_key())
                        .map(|pricing| pricing.estimate(result.tokens_in, result.tokens_out))
                        .unwrap_or(0.0);
                    store
                        .record_llm_call(NewLlmCall {
                            stage: stage.to_string(),
                            provider: result.provider.clone(),
                            model: result.model.clone(),
                            tokens_in: result.tokens_in,
                            tokens_out: result.tokens_out,
                            cost_usd,
                            latency_ms: result.latency_ms,
                            meta: meta.clone(),
                        })
                        .await?;
                    debug!(
                        stage,
                        route = %route,
                        cost_usd,
                        latency_ms = result.latency_ms,
                        "route succeeded"
                    );
                    return Ok(result);
                }
                Err(e) => {
                    warn!(stage, route = %route, error = %e, "route failed, escalating");
                    errors.push(format!("{route_str}: {e}"));
                }
            }
        }

        Err(RouterError::new(RouterErrorKind::exhausted(&errors)).into())
    }
}
