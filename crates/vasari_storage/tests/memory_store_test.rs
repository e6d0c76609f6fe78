//! Tests for the in-memory store's schema invariants.

use chrono::{Duration, Utc};
use serde_json::json;
use vasari_core::{
    DraftStatus, NewDraft, NewEntry, NewLlmCall, NewPublishLog, Platform, UndoPayload, hash_text,
};
use vasari_interface::Store;
use vasari_storage::MemoryStore;

fn new_entry(user_id: &str, text: &str) -> NewEntry {
    NewEntry {
        user_id: user_id.to_string(),
        text: text.to_string(),
        text_hash: hash_text(text),
        source: "chat".to_string(),
        flags: json!({}),
    }
}

fn new_draft(entry_id: i64, platform: Platform, status: DraftStatus) -> NewDraft {
    NewDraft {
        entry_id,
        platform,
        content: "content".to_string(),
        status,
        scheduled_at: None,
        meta: json!({}),
    }
}

#[tokio::test]
async fn duplicate_hash_rejected_per_user_only() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    store.create_entry(new_entry("u1", "same text")).await?;

    let err = store.create_entry(new_entry("u1", "same text")).await;
    assert!(err.is_err());

    // A different user may store identical text.
    let other = store.create_entry(new_entry("u2", "same text")).await?;
    assert_eq!(other.user_id, "u2");
    Ok(())
}

#[tokio::test]
async fn entry_delete_cascades_to_drafts() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let entry = store.create_entry(new_entry("u1", "a")).await?;
    let draft = store
        .create_draft(new_draft(entry.id, Platform::X, DraftStatus::Pending))
        .await?;

    assert!(store.delete_entry(entry.id).await?);
    assert!(store.draft(draft.id).await?.is_none());
    assert!(!store.delete_entry(entry.id).await?);
    Ok(())
}

#[tokio::test]
async fn draft_versions_increment_per_entry_platform() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let entry = store.create_entry(new_entry("u1", "a")).await?;

    let v1 = store
        .create_draft(new_draft(entry.id, Platform::X, DraftStatus::Pending))
        .await?;
    let v2 = store
        .create_draft(new_draft(entry.id, Platform::X, DraftStatus::Pending))
        .await?;
    let threads = store
        .create_draft(new_draft(entry.id, Platform::Threads, DraftStatus::Pending))
        .await?;

    assert_eq!(v1.version, 1);
    assert_eq!(v2.version, 2);
    assert_eq!(threads.version, 1);
    Ok(())
}

#[tokio::test]
async fn due_scheduled_drafts_ordered_by_time_then_id() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let entry = store.create_entry(new_entry("u1", "a")).await?;
    let now = Utc::now();

    let later = NewDraft {
        scheduled_at: Some(now - Duration::minutes(1)),
        ..new_draft(entry.id, Platform::X, DraftStatus::Scheduled)
    };
    let earlier = NewDraft {
        scheduled_at: Some(now - Duration::minutes(10)),
        ..new_draft(entry.id, Platform::Threads, DraftStatus::Scheduled)
    };
    let future = NewDraft {
        scheduled_at: Some(now + Duration::minutes(10)),
        ..new_draft(entry.id, Platform::LinkedIn, DraftStatus::Scheduled)
    };

    let later = store.create_draft(later).await?;
    let earlier = store.create_draft(earlier).await?;
    store.create_draft(future).await?;

    let due = store.due_scheduled_drafts(now).await?;
    assert_eq!(
        due.iter().map(|d| d.id).collect::<Vec<_>>(),
        vec![earlier.id, later.id]
    );
    Ok(())
}

#[tokio::test]
async fn conditional_transition_applies_only_from_expected_status() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let entry = store.create_entry(new_entry("u1", "a")).await?;
    let draft = store
        .create_draft(new_draft(entry.id, Platform::X, DraftStatus::Approved))
        .await?;

    let locked = store
        .transition_draft_status(
            draft.id,
            &[DraftStatus::Approved, DraftStatus::Scheduled],
            DraftStatus::Publishing,
        )
        .await?;
    assert_eq!(locked.unwrap().status, DraftStatus::Publishing);

    // A second claim loses the compare-and-set.
    let second = store
        .transition_draft_status(
            draft.id,
            &[DraftStatus::Approved, DraftStatus::Scheduled],
            DraftStatus::Publishing,
        )
        .await?;
    assert!(second.is_none());

    // Unknown id also yields None.
    let missing = store
        .transition_draft_status(999, &[DraftStatus::Approved], DraftStatus::Publishing)
        .await?;
    assert!(missing.is_none());
    Ok(())
}

#[tokio::test]
async fn publish_log_is_append_only_with_windowed_counts() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let entry = store.create_entry(new_entry("u1", "a")).await?;
    let draft = store
        .create_draft(new_draft(entry.id, Platform::X, DraftStatus::Approved))
        .await?;

    for success in [true, false, true] {
        store
            .record_publish(NewPublishLog {
                draft_id: draft.id,
                platform: Platform::X,
                success,
                response: json!({}),
                error: (!success).then(|| "boom".to_string()),
            })
            .await?;
    }

    let week_ago = Utc::now() - Duration::days(7);
    let successes = store
        .count_publish_successes_since(Platform::X, week_ago)
        .await?;
    assert_eq!(successes, 2);

    let last = store.last_publish_attempt().await?.unwrap();
    assert!(last.success);
    Ok(())
}

#[tokio::test]
async fn cost_summary_aggregates_call_log() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    for (tokens_in, tokens_out, cost) in [(100, 50, 0.01), (200, 100, 0.02)] {
        store
            .record_llm_call(NewLlmCall {
                stage: "summarize".to_string(),
                provider: "openai".to_string(),
                model: "small-1".to_string(),
                tokens_in,
                tokens_out,
                cost_usd: cost,
                latency_ms: 120,
                meta: json!({}),
            })
            .await?;
    }

    let summary = store.cost_summary().await?;
    assert_eq!(summary.calls, 2);
    assert_eq!(summary.tokens_in, 300);
    assert_eq!(summary.tokens_out, 150);
    assert!((summary.cost_usd - 0.03).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn capture_session_flow() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    assert!(store.capture_session("u1").await?.is_none());
    assert!(store.append_capture("u1", "x").await?.is_none());

    store.start_capture("u1").await?;
    store.append_capture("u1", "first").await?;
    let session = store.append_capture("u1", "second").await?.unwrap();
    assert_eq!(session.buffer, "first\n\nsecond");

    let ended = store.end_capture("u1").await?.unwrap();
    assert_eq!(ended.buffer, "first\n\nsecond");
    assert!(store.capture_session("u1").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn user_state_set_overwrite_and_clear() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    assert!(store.user_state("u1").await?.is_none());

    store
        .set_user_state("u1", "awaiting_schedule", json!({ "draft_id": 7 }))
        .await?;
    let state = store.user_state("u1").await?.unwrap();
    assert_eq!(state.state, "awaiting_schedule");
    assert_eq!(state.data["draft_id"], 7);

    // Setting again replaces the tag and payload wholesale.
    store
        .set_user_state("u1", "awaiting_edit", json!({ "draft_id": 9 }))
        .await?;
    let state = store.user_state("u1").await?.unwrap();
    assert_eq!(state.state, "awaiting_edit");
    assert_eq!(state.data["draft_id"], 9);

    // Other users are unaffected.
    assert!(store.user_state("u2").await?.is_none());

    store.clear_user_state("u1").await?;
    assert!(store.user_state("u1").await?.is_none());

    // Clearing an absent state is a no-op.
    store.clear_user_state("u1").await?;
    Ok(())
}

#[tokio::test]
async fn undo_log_tracks_most_recent_open_action() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let first = store
        .record_undo("u1", &UndoPayload::EntryCreate { entry_id: 1 })
        .await?;
    let second = store
        .record_undo("u1", &UndoPayload::DraftCreate { draft_id: 2 })
        .await?;

    let last = store.last_undo("u1").await?.unwrap();
    assert_eq!(last.id, second.id);

    store.mark_undo_done(second.id).await?;
    let last = store.last_undo("u1").await?.unwrap();
    assert_eq!(last.id, first.id);

    assert!(store.last_undo("u2").await?.is_none());
    Ok(())
}
