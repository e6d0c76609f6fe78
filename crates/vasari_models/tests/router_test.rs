//! Tests for the stage router's fallback ladder and cost accounting.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use vasari_core::{GenerationRequest, GenerationResult, VasariConfig};
use vasari_error::{ProviderError, ProviderErrorKind, VasariErrorKind, VasariResult};
use vasari_interface::{GenerationProvider, Store};
use vasari_models::{ProviderRegistry, StageRouter};
use vasari_storage::MemoryStore;

struct ScriptedProvider {
    name: &'static str,
    text: &'static str,
    calls: AtomicU32,
}

impl ScriptedProvider {
    fn new(name: &'static str, text: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            text,
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl GenerationProvider for ScriptedProvider {
    async fn generate(&self, request: &GenerationRequest) -> VasariResult<GenerationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GenerationResult {
            text: self.text.to_string(),
            provider: self.name.to_string(),
            model: request.model.clone(),
            tokens_in: 100,
            tokens_out: 40,
            latency_ms: 5,
        })
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

struct FailingProvider {
    name: &'static str,
}

#[async_trait]
impl GenerationProvider for FailingProvider {
    async fn generate(&self, _request: &GenerationRequest) -> VasariResult<GenerationResult> {
        Err(ProviderError::new(ProviderErrorKind::ApiStatus {
            provider: self.name.to_string(),
            status: 429,
            message: "quota exhausted".to_string(),
        })
        .into())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

fn config_with_routes(stage: &str, routes: &[&str]) -> VasariConfig {
    let mut config = VasariConfig::default();
    config.routing.insert(
        stage.to_string(),
        routes.iter().map(|r| r.to_string()).collect(),
    );
    config
}

#[tokio::test]
async fn first_successful_route_wins_and_logs_one_call() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(FailingProvider { name: "flaky" }));
    let steady = ScriptedProvider::new("steady", "generated text");
    registry.register(steady.clone());

    let config = config_with_routes("summarize", &["flaky:a-1", "steady:b-2"]);
    let router = StageRouter::new(registry);

    let result = router
        .generate(&store, &config, "summarize", "prompt", "system", json!({}))
        .await?;

    assert_eq!(result.provider, "steady");
    assert_eq!(result.model, "b-2");
    assert_eq!(steady.calls.load(Ordering::SeqCst), 1);

    // The failed route logs no usage row; only the success is recorded.
    let summary = store.cost_summary().await?;
    assert_eq!(summary.calls, 1);
    assert_eq!(summary.tokens_in, 100);
    Ok(())
}

#[tokio::test]
async fn later_routes_untouched_after_success() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let mut registry = ProviderRegistry::new();
    let first = ScriptedProvider::new("first", "a");
    let second = ScriptedProvider::new("second", "b");
    registry.register(first.clone());
    registry.register(second.clone());

    let config = config_with_routes("draft_x", &["first:m", "second:m"]);
    let router = StageRouter::new(registry);
    router
        .generate(&store, &config, "draft_x", "p", "s", json!({}))
        .await?;

    assert_eq!(first.calls.load(Ordering::SeqCst), 1);
    assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn cost_uses_pricing_table_and_defaults_to_zero() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let mut registry = ProviderRegistry::new();
    registry.register(ScriptedProvider::new("steady", "t"));

    let mut config = config_with_routes("summarize", &["steady:b-2"]);
    config.pricing.insert(
        "steady:b-2".to_string(),
        vasari_core::Pricing {
            input_per_1k: 1.0,
            output_per_1k: 2.0,
        },
    );

    let router = StageRouter::new(registry.clone());
    router
        .generate(&store, &config, "summarize", "p", "s", json!({}))
        .await?;

    // 100 in at 1.0/1k + 40 out at 2.0/1k
    let summary = store.cost_summary().await?;
    assert!((summary.cost_usd - 0.18).abs() < 1e-9);

    // Unpriced route costs zero.
    let store2 = MemoryStore::new();
    let config2 = config_with_routes("summarize", &["steady:b-2"]);
    let router2 = StageRouter::new(registry);
    router2
        .generate(&store2, &config2, "summarize", "p", "s", json!({}))
        .await?;
    assert_eq!(store2.cost_summary().await?.cost_usd, 0.0);
    Ok(())
}

#[tokio::test]
async fn exhausted_ladder_aggregates_all_route_errors() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(FailingProvider { name: "flaky" }));

    let config = config_with_routes("summarize", &["flaky:a-1", "ghost:b-2"]);
    let router = StageRouter::new(registry);

    let err = router
        .generate(&store, &config, "summarize", "p", "s", json!({}))
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("flaky:a-1"), "{message}");
    assert!(message.contains("ghost:b-2: provider not available"), "{message}");
    assert!(matches!(err.kind(), VasariErrorKind::Router(_)));
    assert_eq!(store.cost_summary().await?.calls, 0);
    Ok(())
}

#[tokio::test]
async fn unconfigured_stage_is_an_error() {
    let store = MemoryStore::new();
    let router = StageRouter::new(ProviderRegistry::new());
    let err = router
        .generate(
            &store,
            &VasariConfig::default(),
            "summarize",
            "p",
            "s",
            json!({}),
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("No routes configured"));
}

#[tokio::test]
async fn override_table_wins_over_config_routes() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let mut registry = ProviderRegistry::new();
    let preferred = ScriptedProvider::new("preferred", "x");
    let configured = ScriptedProvider::new("configured", "y");
    registry.register(preferred.clone());
    registry.register(configured.clone());

    let config = config_with_routes("summarize", &["configured:m"]);
    let mut overrides = HashMap::new();
    overrides.insert("summarize".to_string(), vec!["preferred:m".to_string()]);

    let router = StageRouter::new(registry).with_overrides(overrides);
    let result = router
        .generate(&store, &config, "summarize", "p", "s", json!({}))
        .await?;

    assert_eq!(result.provider, "preferred");
    assert_eq!(configured.calls.load(Ordering::SeqCst), 0);
    Ok(())
}
