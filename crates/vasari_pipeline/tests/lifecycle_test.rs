//! Tests for ingestion, generation, decisions, capture, and undo.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use vasari_core::{
    DraftStatus, Entry, GenerationRequest, GenerationResult, Platform, VasariConfig,
};
use vasari_error::{ProviderError, ProviderErrorKind, VasariResult};
use vasari_interface::{GenerationProvider, Store};
use vasari_models::{ProviderRegistry, StageRouter};
use vasari_pipeline::{
    DraftOutcome, GenerateOutcome, IngestOutcome, Pipeline, RejectReason, UndoOutcome,
};
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
            tokens_in: 50,
            tokens_out: 20,
            latency_ms: 3,
        })
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

struct FailingProvider;

#[async_trait]
impl GenerationProvider for FailingProvider {
    async fn generate(&self, _request: &GenerationRequest) -> VasariResult<GenerationResult> {
        Err(ProviderError::new(ProviderErrorKind::ApiStatus {
            provider: "down".to_string(),
            status: 503,
            message: "outage".to_string(),
        })
        .into())
    }

    fn name(&self) -> &'static str {
        "down"
    }
}

fn router_with(provider: Arc<dyn GenerationProvider>) -> StageRouter {
    let mut registry = ProviderRegistry::new();
    registry.register(provider);
    StageRouter::new(registry)
}

fn config_with_draft_routes(routes: &[&str]) -> VasariConfig {
    let mut config = VasariConfig::default();
    for platform in ["x", "threads", "linkedin"] {
        config.routing.insert(
            format!("draft_{platform}"),
            routes.iter().map(|r| r.to_string()).collect(),
        );
    }
    config
}

async fn ingest(pipeline: &Pipeline<MemoryStore>, user: &str, text: &str) -> Entry {
    match pipeline.ingest_entry(user, text, json!({}), "test").await.unwrap() {
        IngestOutcome::Created(entry) => entry,
        other => panic!("expected created entry, got {other:?}"),
    }
}

#[tokio::test]
async fn ingestion_rejects_empty_and_per_user_duplicates() -> anyhow::Result<()> {
    let pipeline = Pipeline::new(MemoryStore::new(), VasariConfig::default());

    let empty = pipeline
        .ingest_entry("u1", "   \n ", json!({}), "test")
        .await?;
    assert!(matches!(
        empty,
        IngestOutcome::Rejected {
            reason: RejectReason::Empty,
            ..
        }
    ));

    let first = ingest(&pipeline, "u1", "Shipped the parser today.").await;

    // Same normalized text, same user: rejected with the existing entry.
    let dup = pipeline
        .ingest_entry("u1", "  Shipped   the parser TODAY. ", json!({}), "test")
        .await?;
    match dup {
        IngestOutcome::Rejected {
            reason: RejectReason::Duplicate,
            existing: Some(existing),
        } => assert_eq!(existing.id, first.id),
        other => panic!("expected duplicate rejection, got {other:?}"),
    }

    // Same text for another user is fine.
    let second = ingest(&pipeline, "u2", "Shipped the parser today.").await;
    assert_ne!(second.id, first.id);
    Ok(())
}

#[tokio::test]
async fn generation_survives_total_provider_outage() -> anyhow::Result<()> {
    let config = config_with_draft_routes(&["down:m"]);
    let pipeline =
        Pipeline::new(MemoryStore::new(), config).with_router(router_with(Arc::new(FailingProvider)));

    let entry = ingest(&pipeline, "u1", "Wrote the storage layer.").await;
    let outcome = pipeline.generate_drafts(entry.id, None, false).await?;

    let GenerateOutcome::Generated { summary, drafts } = outcome else {
        panic!("generation must not fail outright");
    };
    assert_eq!(summary.meta["mode"], "fallback");
    assert_eq!(drafts.len(), 3);
    for generated in &drafts {
        assert!(generated.validation.ok);
        assert_eq!(generated.draft.status, DraftStatus::Pending);
        let tag = format!("[{}]", generated.draft.platform.tag());
        assert!(generated.draft.content.starts_with(&tag));
        assert_eq!(generated.draft.meta["generation"]["mode"], "fallback");
    }
    Ok(())
}

#[tokio::test]
async fn summarization_degrades_when_llm_disabled() -> anyhow::Result<()> {
    let mut config = VasariConfig::default();
    config.modes.llm_enabled = false;
    let pipeline = Pipeline::new(MemoryStore::new(), config);

    let long_text = "x".repeat(400);
    let entry = ingest(&pipeline, "u1", &long_text).await;
    let summary = pipeline.summarize_entry(entry.id).await?.unwrap();

    assert_eq!(summary.text.chars().count(), 300);
    assert_eq!(summary.meta["mode"], "fallback");
    assert_eq!(summary.meta["reason"], "llm_disabled_or_router_missing");

    assert!(pipeline.summarize_entry(9999).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn drafting_stores_llm_output_with_provenance() -> anyhow::Result<()> {
    let writer = ScriptedProvider::new("steady", "Shipped it!");
    let config = config_with_draft_routes(&["steady:small-1"]);
    let pipeline = Pipeline::new(MemoryStore::new(), config).with_router(router_with(writer));

    let entry = ingest(&pipeline, "u1", "Shipped the parser today.").await;
    let outcome = pipeline
        .generate_drafts(entry.id, Some(&[Platform::X]), false)
        .await?;

    let GenerateOutcome::Generated { drafts, .. } = outcome else {
        panic!("expected drafts");
    };
    assert_eq!(drafts.len(), 1);
    let generated = &drafts[0];
    assert_eq!(generated.draft.platform, Platform::X);
    assert_eq!(generated.draft.status, DraftStatus::Pending);
    assert_eq!(generated.draft.content, "Shipped it!");
    assert_eq!(generated.draft.version, 1);
    assert!(generated.validation.ok);
    assert_eq!(generated.draft.meta["generation"]["provider"], "steady");
    assert_eq!(generated.draft.meta["generation"]["model"], "small-1");
    Ok(())
}

#[tokio::test]
async fn over_limit_draft_gets_one_retry_then_truncation() -> anyhow::Result<()> {
    // The provider always returns 11 chars against a 5-char limit, so the
    // single rewrite attempt cannot help and truncation is the backstop.
    let writer = ScriptedProvider::new("steady", "Shipped it!");
    let mut config = config_with_draft_routes(&["steady:m"]);
    config.limits.x_max_chars = 5;
    let pipeline =
        Pipeline::new(MemoryStore::new(), config).with_router(router_with(writer.clone()));

    let entry = ingest(&pipeline, "u1", "Shipped the parser today.").await;
    let outcome = pipeline
        .generate_drafts(entry.id, Some(&[Platform::X]), false)
        .await?;

    // One drafting call plus exactly one retry.
    assert_eq!(writer.calls.load(Ordering::SeqCst), 2);

    let GenerateOutcome::Generated { drafts, .. } = outcome else {
        panic!("expected drafts");
    };
    assert!(drafts[0].validation.ok);
    assert_eq!(drafts[0].draft.content, "Sh...");
    Ok(())
}

#[tokio::test]
async fn tiny_limit_hard_truncates_without_marker() -> anyhow::Result<()> {
    let writer = ScriptedProvider::new("steady", "Shipped it!");
    let mut config = config_with_draft_routes(&["steady:m"]);
    config.limits.x_max_chars = 3;
    let pipeline = Pipeline::new(MemoryStore::new(), config).with_router(router_with(writer));

    let entry = ingest(&pipeline, "u1", "Shipped the parser today.").await;
    let outcome = pipeline
        .generate_drafts(entry.id, Some(&[Platform::X]), false)
        .await?;

    let GenerateOutcome::Generated { drafts, .. } = outcome else {
        panic!("expected drafts");
    };
    assert_eq!(drafts[0].draft.content, "Shi");
    assert!(drafts[0].validation.ok);
    Ok(())
}

#[tokio::test]
async fn regeneration_supersedes_without_deleting() -> anyhow::Result<()> {
    let writer = ScriptedProvider::new("steady", "First take.");
    let config = config_with_draft_routes(&["steady:m"]);
    let pipeline = Pipeline::new(MemoryStore::new(), config).with_router(router_with(writer));

    let entry = ingest(&pipeline, "u1", "Refactored the router.").await;
    let outcome = pipeline
        .generate_drafts(entry.id, Some(&[Platform::Threads]), true)
        .await?;
    let GenerateOutcome::Generated { drafts, .. } = outcome else {
        panic!("expected drafts");
    };
    let old_id = drafts[0].draft.id;

    let regenerated = pipeline.regenerate_draft("u1", old_id).await?;
    let DraftOutcome::Updated { draft: new_draft, .. } = regenerated else {
        panic!("expected a new draft");
    };

    assert_ne!(new_draft.id, old_id);
    assert_eq!(new_draft.version, 2);
    assert_eq!(new_draft.status, DraftStatus::Pending);
    assert_eq!(new_draft.meta["regenerated_from"], old_id);
    assert_eq!(new_draft.meta["strict"], true);

    // The old draft coexists, rejected.
    let old = pipeline.store().draft(old_id).await?.unwrap();
    assert_eq!(old.status, DraftStatus::Rejected);
    Ok(())
}

#[tokio::test]
async fn edits_truncate_and_reference_the_original() -> anyhow::Result<()> {
    let mut config = VasariConfig::default();
    config.modes.llm_enabled = false;
    config.limits.x_max_chars = 10;
    let pipeline = Pipeline::new(MemoryStore::new(), config);

    let entry = ingest(&pipeline, "u1", "Some diary text.").await;
    let outcome = pipeline
        .generate_drafts(entry.id, Some(&[Platform::X]), false)
        .await?;
    let GenerateOutcome::Generated { drafts, .. } = outcome else {
        panic!("expected drafts");
    };
    let old_id = drafts[0].draft.id;

    let edited = pipeline
        .edit_draft("u1", old_id, "a replacement that is long")
        .await?;
    let DraftOutcome::Updated {
        draft,
        validation: Some(validation),
    } = edited
    else {
        panic!("expected edited draft");
    };
    assert!(validation.ok);
    assert!(draft.content.chars().count() <= 10);
    assert!(draft.content.ends_with("..."));
    assert_eq!(draft.meta["edited_from"], old_id);
    assert_eq!(draft.version, 2);

    let missing = pipeline.edit_draft("u1", 424242, "text").await?;
    assert!(matches!(
        missing,
        DraftOutcome::Rejected {
            reason: RejectReason::DraftNotFound
        }
    ));
    Ok(())
}

#[tokio::test]
async fn undo_reverses_ingestion_and_status_changes() -> anyhow::Result<()> {
    let mut config = VasariConfig::default();
    config.modes.llm_enabled = false;
    let pipeline = Pipeline::new(MemoryStore::new(), config);

    // Entry creation is reversible: after undo the entry is gone.
    let entry = ingest(&pipeline, "u1", "Throwaway thought.").await;
    let undone = pipeline.undo_last_action("u1").await?;
    assert!(matches!(undone, UndoOutcome::Undone { ref action } if action == "entry_create"));
    assert!(pipeline.store().entry(entry.id).await?.is_none());

    // A status change restores the prior status and scheduled time on undo.
    let entry = ingest(&pipeline, "u1", "Keeper thought.").await;
    let outcome = pipeline
        .generate_drafts(entry.id, Some(&[Platform::X]), false)
        .await?;
    let GenerateOutcome::Generated { drafts, .. } = outcome else {
        panic!("expected drafts");
    };
    let draft_id = drafts[0].draft.id;

    pipeline
        .set_draft_decision("u1", draft_id, DraftStatus::Approved)
        .await?;
    let undone = pipeline.undo_last_action("u1").await?;
    assert!(matches!(undone, UndoOutcome::Undone { ref action } if action == "draft_status_update"));

    let draft = pipeline.store().draft(draft_id).await?.unwrap();
    assert_eq!(draft.status, DraftStatus::Pending);
    assert_eq!(draft.scheduled_at, None);
    Ok(())
}

#[tokio::test]
async fn undo_with_empty_log_is_rejected() -> anyhow::Result<()> {
    let pipeline = Pipeline::new(MemoryStore::new(), VasariConfig::default());
    let outcome = pipeline.undo_last_action("u1").await?;
    assert!(matches!(
        outcome,
        UndoOutcome::Rejected {
            reason: RejectReason::NothingToUndo,
            action: None,
        }
    ));
    Ok(())
}

#[tokio::test]
async fn capture_buffers_messages_into_one_entry() -> anyhow::Result<()> {
    let pipeline = Pipeline::new(MemoryStore::new(), VasariConfig::default());

    // No active session yet.
    let premature = pipeline.finish_capture("u1", json!({}), "test").await?;
    assert!(matches!(
        premature,
        IngestOutcome::Rejected {
            reason: RejectReason::NoActiveSession,
            ..
        }
    ));

    pipeline.start_capture("u1").await?;
    pipeline.append_capture("u1", "Morning: fixed the codec.").await?;
    pipeline.append_capture("u1", "Evening: wrote tests.").await?;

    let outcome = pipeline.finish_capture("u1", json!({}), "test").await?;
    let IngestOutcome::Created(entry) = outcome else {
        panic!("expected captured entry");
    };
    assert_eq!(entry.text, "Morning: fixed the codec.\n\nEvening: wrote tests.");

    // The session was consumed.
    assert!(pipeline.store().capture_session("u1").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn decisions_record_undo_per_transition() -> anyhow::Result<()> {
    let mut config = VasariConfig::default();
    config.modes.llm_enabled = false;
    let pipeline = Pipeline::new(MemoryStore::new(), config);

    let entry = ingest(&pipeline, "u1", "Two-step day.").await;
    let outcome = pipeline
        .generate_drafts(entry.id, Some(&[Platform::LinkedIn]), false)
        .await?;
    let GenerateOutcome::Generated { drafts, .. } = outcome else {
        panic!("expected drafts");
    };
    let draft_id = drafts[0].draft.id;

    pipeline
        .set_draft_decision("u1", draft_id, DraftStatus::Approved)
        .await?;
    pipeline
        .set_draft_decision("u1", draft_id, DraftStatus::Rejected)
        .await?;

    // Undo pops the most recent transition first.
    pipeline.undo_last_action("u1").await?;
    let draft = pipeline.store().draft(draft_id).await?.unwrap();
    assert_eq!(draft.status, DraftStatus::Approved);

    pipeline.undo_last_action("u1").await?;
    let draft = pipeline.store().draft(draft_id).await?.unwrap();
    assert_eq!(draft.status, DraftStatus::Pending);
    Ok(())
}
