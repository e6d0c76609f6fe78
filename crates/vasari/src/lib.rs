//! Vasari - diary entries to approved social posts.
//!
//! Vasari ingests short diary-style text entries, turns each into
//! platform-tailored drafts through a multi-provider generation ladder,
//! runs the drafts through a human approval workflow, and publishes the
//! approved ones to X, Threads, and LinkedIn.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use vasari::{MemoryStore, Pipeline, PublisherRegistry, StageRouter, VasariConfig};
//!
//! # async fn run() -> vasari::VasariResult<()> {
//! vasari::load_env();
//! vasari::init_tracing();
//!
//! let config = VasariConfig::load("vasari.toml")?;
//! let router = StageRouter::new(vasari::providers_from_env());
//! let pipeline = Pipeline::new(MemoryStore::new(), config).with_router(router);
//! let publishers = vasari::publishers_from_env();
//!
//! let outcome = pipeline
//!     .ingest_entry("u1", "Shipped the parser today.", serde_json::json!({}), "cli")
//!     .await?;
//! # let _ = (outcome, publishers);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! Vasari is organized as a workspace with focused crates:
//!
//! - `vasari_error` - Error types
//! - `vasari_core` - Core data types, validation, hashing, configuration
//! - `vasari_interface` - Provider, publisher, and store capability traits
//! - `vasari_storage` - In-memory store implementation
//! - `vasari_models` - LLM provider clients and the stage router
//! - `vasari_social` - Platform publisher clients
//! - `vasari_pipeline` - The draft lifecycle orchestrator and scheduler
//!
//! This crate (`vasari`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use vasari_core::*;
pub use vasari_error::*;
pub use vasari_interface::*;
pub use vasari_models::*;
pub use vasari_pipeline::*;
pub use vasari_social::*;
pub use vasari_storage::*;

use std::sync::Arc;

/// Load a `.env` file into the process environment, if one exists.
pub fn load_env() {
    dotenvy::dotenv().ok();
}

/// Initialize tracing with an env-filter subscriber (`RUST_LOG` controls
/// verbosity). Safe to call once per process.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

/// Build a provider registry from environment credentials, registering each
/// vendor whose API key is present.
pub fn providers_from_env() -> ProviderRegistry {
    ProviderRegistry::from_env()
}

/// Build a publisher registry covering all three platforms from environment
/// credentials. Publishers with missing credentials still work in dry-run
/// and report the gap on a live publish attempt.
pub fn publishers_from_env() -> PublisherRegistry {
    let mut registry = PublisherRegistry::new();
    registry.register(Arc::new(XPublisher::from_env()));
    registry.register(Arc::new(ThreadsPublisher::from_env()));
    registry.register(Arc::new(LinkedInPublisher::from_env()));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publisher_registry_covers_all_platforms() {
        let registry = publishers_from_env();
        assert_eq!(
            registry.platforms(),
            vec![Platform::X, Platform::Threads, Platform::LinkedIn]
        );
    }

    #[tokio::test]
    async fn facade_wires_an_offline_pipeline() {
        let mut config = VasariConfig::default();
        config.modes.llm_enabled = false;
        let pipeline = Pipeline::new(MemoryStore::new(), config);

        let outcome = pipeline
            .ingest_entry("u1", "A facade smoke test.", serde_json::json!({}), "test")
            .await
            .unwrap();
        assert!(outcome.is_created());
    }
}
