//! The in-memory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use tracing::debug;
use vasari_core::{
    CaptureSession, CostSummary, Draft, DraftStatus, Entry, LlmCall, NewDraft, NewEntry,
    NewLlmCall, NewPublishLog, Platform, PublishLog, UndoAction, UndoPayload, UserState,
};
use vasari_error::{StorageError, StorageErrorKind, VasariResult};

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<i64, Entry>,
    drafts: BTreeMap<i64, Draft>,
    publish_logs: Vec<PublishLog>,
    llm_calls: Vec<LlmCall>,
    settings: HashMap<String, JsonValue>,
    sessions: HashMap<String, CaptureSession>,
    user_states: HashMap<String, UserState>,
    undo_actions: Vec<UndoAction>,
    entry_seq: i64,
    draft_seq: i64,
    publish_seq: i64,
    llm_seq: i64,
    undo_seq: i64,
}

/// In-memory [`Store`](vasari_interface::Store) implementation.
///
/// # Examples
///
/// ```
/// use vasari_storage::MemoryStore;
/// use vasari_interface::Store;
/// use vasari_core::{NewEntry, hash_text};
///
/// # async fn example() -> vasari_error::VasariResult<()> {
/// let store = MemoryStore::new();
/// let entry = store
///     .create_entry(NewEntry {
///         user_id: "u1".to_string(),
///         text: "Shipped the parser today.".to_string(),
///         text_hash: hash_text("Shipped the parser today."),
///         source: "chat".to_string(),
///         flags: serde_json::json!({}),
///     })
///     .await?;
/// assert_eq!(entry.id, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> VasariResult<std::sync::MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|e| {
            StorageError::new(StorageErrorKind::Backend(format!("poisoned lock: {e}"))).into()
        })
    }
}

#[async_trait]
impl vasari_interface::Store for MemoryStore {
    async fn create_entry(&self, new: NewEntry) -> VasariResult<Entry> {
        let mut inner = self.lock()?;
        if inner
            .entries
            .values()
            .any(|e| e.user_id == new.user_id && e.text_hash == new.text_hash)
        {
            return Err(StorageError::new(StorageErrorKind::Duplicate {
                entity: "entry",
                detail: format!("user {} already has hash {}", new.user_id, new.text_hash),
            })
            .into());
        }
        inner.entry_seq += 1;
        let entry = Entry {
            id: inner.entry_seq,
            user_id: new.user_id,
            created_at: Utc::now(),
            text: new.text,
            text_hash: new.text_hash,
            source: new.source,
            flags: new.flags,
        };
        debug!(entry_id = entry.id, user_id = %entry.user_id, "created entry");
        inner.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn entry(&self, id: i64) -> VasariResult<Option<Entry>> {
        Ok(self.lock()?.entries.get(&id).cloned())
    }

    async fn entry_by_hash(
        &self,
        user_id: &str,
        text_hash: &str,
    ) -> VasariResult<Option<Entry>> {
        Ok(self
            .lock()?
            .entries
            .values()
            .find(|e| e.user_id == user_id && e.text_hash == text_hash)
            .cloned())
    }

    async fn latest_entry_for_user(&self, user_id: &str) -> VasariResult<Option<Entry>> {
        Ok(self
            .lock()?
            .entries
            .values()
            .filter(|e| e.user_id == user_id)
            .max_by_key(|e| e.id)
            .cloned())
    }

    async fn delete_entry(&self, id: i64) -> VasariResult<bool> {
        let mut inner = self.lock()?;
        let existed = inner.entries.remove(&id).is_some();
        if existed {
            // Foreign-key cascade: drafts belong to their entry.
            inner.drafts.retain(|_, d| d.entry_id != id);
        }
        Ok(existed)
    }

    async fn create_draft(&self, new: NewDraft) -> VasariResult<Draft> {
        let mut inner = self.lock()?;
        if !inner.entries.contains_key(&new.entry_id) {
            return Err(StorageError::new(StorageErrorKind::NotFound {
                entity: "entry",
                id: new.entry_id,
            })
            .into());
        }
        let version = inner
            .drafts
            .values()
            .filter(|d| d.entry_id == new.entry_id && d.platform == new.platform)
            .map(|d| d.version)
            .max()
            .unwrap_or(0)
            + 1;
        inner.draft_seq += 1;
        let draft = Draft {
            id: inner.draft_seq,
            entry_id: new.entry_id,
            platform: new.platform,
            created_at: Utc::now(),
            content: new.content,
            status: new.status,
            scheduled_at: new.scheduled_at,
            meta: new.meta,
            version,
        };
        debug!(
            draft_id = draft.id,
            platform = %draft.platform,
            version,
            "created draft"
        );
        inner.drafts.insert(draft.id, draft.clone());
        Ok(draft)
    }

    async fn draft(&self, id: i64) -> VasariResult<Option<Draft>> {
        Ok(self.lock()?.drafts.get(&id).cloned())
    }

    async fn update_draft_status(
        &self,
        id: i64,
        status: DraftStatus,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> VasariResult<Option<Draft>> {
        let mut inner = self.lock()?;
        Ok(inner.drafts.get_mut(&id).map(|draft| {
            draft.status = status;
            draft.scheduled_at = scheduled_at;
            draft.clone()
        }))
    }

    async fn transition_draft_status(
        &self,
        id: i64,
        expected: &[DraftStatus],
        to: DraftStatus,
    ) -> VasariResult<Option<Draft>> {
        let mut inner = self.lock()?;
        Ok(inner.drafts.get_mut(&id).and_then(|draft| {
            if expected.contains(&draft.status) {
                draft.status = to;
                Some(draft.clone())
            } else {
                None
            }
        }))
    }

    async fn delete_draft(&self, id: i64) -> VasariResult<bool> {
        Ok(self.lock()?.drafts.remove(&id).is_some())
    }

    async fn drafts_for_entry(&self, entry_id: i64) -> VasariResult<Vec<Draft>> {
        let inner = self.lock()?;
        let mut drafts: Vec<Draft> = inner
            .drafts
            .values()
            .filter(|d| d.entry_id == entry_id)
            .cloned()
            .collect();
        drafts.sort_by(|a, b| {
            a.platform
                .cmp(&b.platform)
                .then(b.version.cmp(&a.version))
                .then(b.id.cmp(&a.id))
        });
        Ok(drafts)
    }

    async fn pending_drafts(&self, user_id: &str, limit: usize) -> VasariResult<Vec<Draft>> {
        let inner = self.lock()?;
        let mut drafts: Vec<Draft> = inner
            .drafts
            .values()
            .filter(|d| {
                d.status == DraftStatus::Pending
                    && inner
                        .entries
                        .get(&d.entry_id)
                        .is_some_and(|e| e.user_id == user_id)
            })
            .cloned()
            .collect();
        drafts.sort_by(|a, b| b.id.cmp(&a.id));
        drafts.truncate(limit);
        Ok(drafts)
    }

    async fn approved_drafts(&self, user_id: Option<&str>) -> VasariResult<Vec<Draft>> {
        let inner = self.lock()?;
        let mut drafts: Vec<Draft> = inner
            .drafts
            .values()
            .filter(|d| {
                d.status == DraftStatus::Approved
                    && user_id.is_none_or(|user| {
                        inner
                            .entries
                            .get(&d.entry_id)
                            .is_some_and(|e| e.user_id == user)
                    })
            })
            .cloned()
            .collect();
        drafts.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(drafts)
    }

    async fn due_scheduled_drafts(&self, now: DateTime<Utc>) -> VasariResult<Vec<Draft>> {
        let inner = self.lock()?;
        let mut drafts: Vec<Draft> = inner
            .drafts
            .values()
            .filter(|d| {
                d.status == DraftStatus::Scheduled
                    && d.scheduled_at.is_some_and(|at| at <= now)
            })
            .cloned()
            .collect();
        drafts.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at).then(a.id.cmp(&b.id)));
        Ok(drafts)
    }

    async fn record_publish(&self, new: NewPublishLog) -> VasariResult<PublishLog> {
        let mut inner = self.lock()?;
        inner.publish_seq += 1;
        let log = PublishLog {
            id: inner.publish_seq,
            draft_id: new.draft_id,
            platform: new.platform,
            attempted_at: Utc::now(),
            success: new.success,
            response: new.response,
            error: new.error,
        };
        inner.publish_logs.push(log.clone());
        Ok(log)
    }

    async fn last_publish_attempt(&self) -> VasariResult<Option<PublishLog>> {
        Ok(self.lock()?.publish_logs.last().cloned())
    }

    async fn count_publish_successes_since(
        &self,
        platform: Platform,
        since: DateTime<Utc>,
    ) -> VasariResult<u64> {
        Ok(self
            .lock()?
            .publish_logs
            .iter()
            .filter(|log| log.platform == platform && log.success && log.attempted_at >= since)
            .count() as u64)
    }

    async fn record_llm_call(&self, new: NewLlmCall) -> VasariResult<LlmCall> {
        let mut inner = self.lock()?;
        inner.llm_seq += 1;
        let call = LlmCall {
            id: inner.llm_seq,
            stage: new.stage,
            provider: new.provider,
            model: new.model,
            tokens_in: new.tokens_in,
            tokens_out: new.tokens_out,
            cost_usd: new.cost_usd,
            latency_ms: new.latency_ms,
            created_at: Utc::now(),
            meta: new.meta,
        };
        inner.llm_calls.push(call.clone());
        Ok(call)
    }

    async fn cost_summary(&self) -> VasariResult<CostSummary> {
        let inner = self.lock()?;
        let mut summary = CostSummary::default();
        for call in &inner.llm_calls {
            summary.calls += 1;
            summary.tokens_in += u64::from(call.tokens_in);
            summary.tokens_out += u64::from(call.tokens_out);
            summary.cost_usd += call.cost_usd;
        }
        Ok(summary)
    }

    async fn set_global_setting(&self, key: &str, value: JsonValue) -> VasariResult<()> {
        self.lock()?.settings.insert(key.to_string(), value);
        Ok(())
    }

    async fn global_setting(&self, key: &str) -> VasariResult<Option<JsonValue>> {
        Ok(self.lock()?.settings.get(key).cloned())
    }

    async fn capture_session(&self, user_id: &str) -> VasariResult<Option<CaptureSession>> {
        Ok(self.lock()?.sessions.get(user_id).cloned())
    }

    async fn start_capture(&self, user_id: &str) -> VasariResult<CaptureSession> {
        let mut inner = self.lock()?;
        let session = CaptureSession {
            user_id: user_id.to_string(),
            started_at: Utc::now(),
            buffer: String::new(),
        };
        inner.sessions.insert(user_id.to_string(), session.clone());
        Ok(session)
    }

    async fn append_capture(
        &self,
        user_id: &str,
        chunk: &str,
    ) -> VasariResult<Option<CaptureSession>> {
        let mut inner = self.lock()?;
        Ok(inner.sessions.get_mut(user_id).map(|session| {
            if !session.buffer.is_empty() {
                session.buffer.push_str("\n\n");
            }
            session.buffer.push_str(chunk);
            session.clone()
        }))
    }

    async fn end_capture(&self, user_id: &str) -> VasariResult<Option<CaptureSession>> {
        Ok(self.lock()?.sessions.remove(user_id))
    }

    async fn set_user_state(
        &self,
        user_id: &str,
        state: &str,
        data: JsonValue,
    ) -> VasariResult<UserState> {
        let mut inner = self.lock()?;
        let user_state = UserState {
            user_id: user_id.to_string(),
            state: state.to_string(),
            data,
            updated_at: Utc::now(),
        };
        inner
            .user_states
            .insert(user_id.to_string(), user_state.clone());
        Ok(user_state)
    }

    async fn user_state(&self, user_id: &str) -> VasariResult<Option<UserState>> {
        Ok(self.lock()?.user_states.get(user_id).cloned())
    }

    async fn clear_user_state(&self, user_id: &str) -> VasariResult<()> {
        self.lock()?.user_states.remove(user_id);
        Ok(())
    }

    async fn record_undo(
        &self,
        user_id: &str,
        payload: &UndoPayload,
    ) -> VasariResult<UndoAction> {
        let mut inner = self.lock()?;
        inner.undo_seq += 1;
        let action = UndoAction {
            id: inner.undo_seq,
            user_id: user_id.to_string(),
            action: payload.action().to_string(),
            payload: serde_json::to_value(payload).map_err(|e| {
                StorageError::new(StorageErrorKind::Backend(format!(
                    "serialize undo payload: {e}"
                )))
            })?,
            created_at: Utc::now(),
            undone: false,
        };
        inner.undo_actions.push(action.clone());
        Ok(action)
    }

    async fn last_undo(&self, user_id: &str) -> VasariResult<Option<UndoAction>> {
        Ok(self
            .lock()?
            .undo_actions
            .iter()
            .rev()
            .find(|a| a.user_id == user_id && !a.undone)
            .cloned())
    }

    async fn mark_undo_done(&self, id: i64) -> VasariResult<()> {
        let mut inner = self.lock()?;
        if let Some(action) = inner.undo_actions.iter_mut().find(|a| a.id == id) {
            action.undone = true;
            Ok(())
        } else {
            Err(StorageError::new(StorageErrorKind::NotFound {
                entity: "undo_action",
                id,
            })
            .into())
        }
    }
}
