//! The draft lifecycle orchestrator.
//!
//! [`Pipeline`] owns the state machine that moves a diary entry from
//! ingestion through generation, human decision, and publication. Every
//! operation takes explicit collaborators (store via the struct, publishers
//! per call) and returns a structured outcome; domain rejections never
//! surface as errors.
//!
//! Generation degrades rather than fails: a provider outage falls back to a
//! deterministic draft, and content that exceeds a platform limit gets one
//! bounded rewrite attempt followed by unconditional truncation, so a
//! validated draft is always produced.

use crate::{
    DraftOutcome, GenerateOutcome, GeneratedDraft, IngestOutcome, PublishOutcome,
    PublisherRegistry, QueueOutcome, RejectReason, StatusSnapshot, StyleSheet, Summary,
    SweepOutcome, UndoOutcome,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::{Value as JsonValue, json};
use tracing::{debug, info, instrument, warn};
use vasari_core::{
    CaptureSession, Draft, DraftStatus, Entry, NewDraft, NewEntry, NewPublishLog, Platform,
    UndoPayload, VasariConfig, hash_text, truncate_to_limit, validate,
};
use vasari_error::{VasariError, VasariErrorKind, VasariResult};
use vasari_interface::Store;
use vasari_models::StageRouter;

/// Characters of raw text kept when summarization falls back.
const FALLBACK_SUMMARY_CHARS: usize = 300;

/// Window for the rolling per-platform publish cap.
const CAP_WINDOW_DAYS: i64 = 7;

/// Whether an error is a generation failure the orchestrator degrades from,
/// as opposed to an infrastructure failure it must propagate.
fn is_generation_failure(error: &VasariError) -> bool {
    matches!(
        error.kind(),
        VasariErrorKind::Provider(_) | VasariErrorKind::Router(_)
    )
}

fn deterministic_draft(platform: Platform, summary: &str, entry_text: &str, limit: usize) -> String {
    let base = if summary.is_empty() {
        format!("[{}] {entry_text}", platform.tag())
    } else {
        format!("[{}] {summary}", platform.tag())
    };
    truncate_to_limit(&base, limit)
}

fn stage_for(platform: Platform) -> String {
    format!("draft_{platform}")
}

/// The entry-to-publication orchestrator.
///
/// Generic over the store so tests run against the in-memory backend and
/// deployments can substitute their own persistence.
#[derive(Debug)]
pub struct Pipeline<S> {
    store: S,
    config: VasariConfig,
    router: Option<StageRouter>,
    style: StyleSheet,
}

impl<S: Store> Pipeline<S> {
    /// Create a pipeline without generation; drafting uses deterministic
    /// fallbacks until a router is attached.
    pub fn new(store: S, config: VasariConfig) -> Self {
        Self {
            store,
            config,
            router: None,
            style: StyleSheet::default(),
        }
    }

    /// Attach a stage router for LLM generation.
    pub fn with_router(mut self, router: StageRouter) -> Self {
        self.router = Some(router);
        self
    }

    /// Replace the default style sheet.
    pub fn with_style(mut self, style: StyleSheet) -> Self {
        self.style = style;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &VasariConfig {
        &self.config
    }

    fn active_router(&self) -> Option<&StageRouter> {
        if self.config.modes.llm_enabled {
            self.router.as_ref()
        } else {
            None
        }
    }

    // -- ingestion --------------------------------------------------------

    /// Ingest raw user text as a new entry.
    ///
    /// Empty text (after trimming) and per-user duplicates (by normalized
    /// hash) are rejected; a duplicate rejection carries the existing entry
    /// for reference. Successful ingestion records an undo entry.
    #[instrument(skip(self, text, flags))]
    pub async fn ingest_entry(
        &self,
        user_id: &str,
        text: &str,
        flags: JsonValue,
        source: &str,
    ) -> VasariResult<IngestOutcome> {
        let cleaned = text.trim();
        if cleaned.is_empty() {
            return Ok(IngestOutcome::Rejected {
                reason: RejectReason::Empty,
                existing: None,
            });
        }

        let text_hash = hash_text(cleaned);
        if let Some(existing) = self.store.entry_by_hash(user_id, &text_hash).await? {
            debug!(entry_id = existing.id, "duplicate submission");
            return Ok(IngestOutcome::Rejected {
                reason: RejectReason::Duplicate,
                existing: Some(existing),
            });
        }

        let entry = self
            .store
            .create_entry(NewEntry {
                user_id: user_id.to_string(),
                text: cleaned.to_string(),
                text_hash,
                source: source.to_string(),
                flags,
            })
            .await?;
        self.store
            .record_undo(user_id, &UndoPayload::EntryCreate { entry_id: entry.id })
            .await?;
        info!(entry_id = entry.id, "entry ingested");
        Ok(IngestOutcome::Created(entry))
    }

    // -- generation -------------------------------------------------------

    /// Summarize an entry by id. Returns `None` for an unknown id.
    pub async fn summarize_entry(&self, entry_id: i64) -> VasariResult<Option<Summary>> {
        match self.store.entry(entry_id).await? {
            Some(entry) => Ok(Some(self.summarize(&entry).await?)),
            None => Ok(None),
        }
    }

    /// Summarize an entry, degrading to a raw-text prefix when generation
    /// is disabled, unconfigured, or failing.
    async fn summarize(&self, entry: &Entry) -> VasariResult<Summary> {
        let fallback = || entry.text.chars().take(FALLBACK_SUMMARY_CHARS).collect();

        let Some(router) = self.active_router() else {
            return Ok(Summary {
                text: fallback(),
                meta: json!({
                    "mode": "fallback",
                    "stage": "summarize",
                    "reason": "llm_disabled_or_router_missing",
                }),
            });
        };

        let system = self.style.system_prompt();
        let prompt = self.style.summary_prompt(&entry.text);
        match router
            .generate(
                &self.store,
                &self.config,
                "summarize",
                &prompt,
                &system,
                json!({"entry_id": entry.id}),
            )
            .await
        {
            Ok(result) => {
                let text = if result.text.trim().is_empty() {
                    fallback()
                } else {
                    result.text
                };
                Ok(Summary {
                    text,
                    meta: json!({
                        "mode": "llm",
                        "stage": "summarize",
                        "provider": result.provider,
                        "model": result.model,
                    }),
                })
            }
            Err(e) if is_generation_failure(&e) => {
                warn!(entry_id = entry.id, error = %e, "summarization degraded to fallback");
                let reason: String = e.to_string().chars().take(240).collect();
                Ok(Summary {
                    text: fallback(),
                    meta: json!({
                        "mode": "fallback",
                        "stage": "summarize",
                        "reason": reason,
                    }),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Generate one pending draft per requested platform.
    ///
    /// Provider failure falls back to a deterministic `[TAG] summary` draft;
    /// over-limit content gets one rewrite attempt, then truncation. Every
    /// created draft passes validation and records an undo entry.
    #[instrument(skip(self, platforms))]
    pub async fn generate_drafts(
        &self,
        entry_id: i64,
        platforms: Option<&[Platform]>,
        is_strict: bool,
    ) -> VasariResult<GenerateOutcome> {
        let Some(entry) = self.store.entry(entry_id).await? else {
            return Ok(GenerateOutcome::Rejected {
                reason: RejectReason::EntryNotFound,
            });
        };

        let platform_list: Vec<Platform> = match platforms {
            Some(list) => list.to_vec(),
            None => self.config.enabled_platforms(),
        };
        let summary = self.summarize(&entry).await?;
        let system = self.style.system_prompt();
        let mut drafts = Vec::with_capacity(platform_list.len());

        for platform in platform_list {
            let limit = self.config.limit_for(platform);
            let stage = stage_for(platform);

            let (mut content, generation_meta) = if let Some(router) = self.active_router() {
                let prompt =
                    self.style
                        .draft_prompt(platform, &entry.text, &summary.text, is_strict, limit);
                match router
                    .generate(
                        &self.store,
                        &self.config,
                        &stage,
                        &prompt,
                        &system,
                        json!({"entry_id": entry.id, "platform": platform, "strict": is_strict}),
                    )
                    .await
                {
                    Ok(result) => (
                        result.text.trim().to_string(),
                        json!({
                            "mode": "llm",
                            "stage": stage,
                            "provider": result.provider,
                            "model": result.model,
                        }),
                    ),
                    Err(e) if is_generation_failure(&e) => {
                        warn!(%platform, error = %e, "drafting degraded to fallback");
                        (
                            deterministic_draft(platform, &summary.text, &entry.text, limit),
                            json!({"mode": "fallback", "stage": stage, "reason": "provider_error"}),
                        )
                    }
                    Err(e) => return Err(e),
                }
            } else {
                (
                    deterministic_draft(platform, &summary.text, &entry.text, limit),
                    json!({
                        "mode": "fallback",
                        "stage": stage,
                        "reason": "llm_disabled_or_router_missing",
                    }),
                )
            };

            let mut validation = validate(&content, limit);
            if !validation.ok {
                if let Some(router) = self.active_router() {
                    let retry_prompt = format!(
                        "Rewrite this {platform} draft under {limit} chars without losing the core meaning.\n\nOriginal draft:\n{content}"
                    );
                    match router
                        .generate(
                            &self.store,
                            &self.config,
                            &stage,
                            &retry_prompt,
                            &system,
                            json!({"entry_id": entry.id, "platform": platform, "retry": true}),
                        )
                        .await
                    {
                        Ok(result) => {
                            content = result.text.trim().to_string();
                            validation = validate(&content, limit);
                        }
                        Err(e) if is_generation_failure(&e) => {
                            content = truncate_to_limit(&content, limit);
                            validation = validate(&content, limit);
                        }
                        Err(e) => return Err(e),
                    }
                }
                if !validation.ok {
                    content = truncate_to_limit(&content, limit);
                    validation = validate(&content, limit);
                }
            }

            let draft = self
                .store
                .create_draft(NewDraft {
                    entry_id: entry.id,
                    platform,
                    content,
                    status: DraftStatus::Pending,
                    scheduled_at: None,
                    meta: json!({
                        "summary": summary.text,
                        "summary_meta": summary.meta,
                        "generation": generation_meta,
                        "strict": is_strict,
                        "validation": validation.to_value(),
                    }),
                })
                .await?;
            self.store
                .record_undo(
                    &entry.user_id,
                    &UndoPayload::DraftCreate { draft_id: draft.id },
                )
                .await?;
            debug!(draft_id = draft.id, %platform, version = draft.version, "draft created");
            drafts.push(GeneratedDraft { draft, validation });
        }

        Ok(GenerateOutcome::Generated { summary, drafts })
    }

    // -- decisions --------------------------------------------------------

    /// Apply a status decision (approve/reject) to a draft, recording the
    /// prior status for undo.
    #[instrument(skip(self))]
    pub async fn set_draft_decision(
        &self,
        user_id: &str,
        draft_id: i64,
        new_status: DraftStatus,
    ) -> VasariResult<DraftOutcome> {
        let Some(draft) = self.store.draft(draft_id).await? else {
            return Ok(DraftOutcome::Rejected {
                reason: RejectReason::DraftNotFound,
            });
        };

        let Some(updated) = self
            .store
            .update_draft_status(draft_id, new_status, draft.scheduled_at)
            .await?
        else {
            return Ok(DraftOutcome::Rejected {
                reason: RejectReason::DraftNotFound,
            });
        };
        self.store
            .record_undo(
                user_id,
                &UndoPayload::DraftStatusUpdate {
                    draft_id,
                    previous_status: draft.status,
                    previous_scheduled_at: draft.scheduled_at,
                },
            )
            .await?;
        info!(draft_id, status = %new_status, "draft decision applied");
        Ok(DraftOutcome::Updated {
            draft: updated,
            validation: None,
        })
    }

    /// Supersede a draft with a fresh alternative.
    ///
    /// Reuses the stored summary and strictness; the old draft becomes
    /// `rejected` and a new pending version is created alongside it.
    #[instrument(skip(self))]
    pub async fn regenerate_draft(
        &self,
        user_id: &str,
        draft_id: i64,
    ) -> VasariResult<DraftOutcome> {
        let Some(draft) = self.store.draft(draft_id).await? else {
            return Ok(DraftOutcome::Rejected {
                reason: RejectReason::DraftNotFound,
            });
        };
        let Some(entry) = self.store.entry(draft.entry_id).await? else {
            return Ok(DraftOutcome::Rejected {
                reason: RejectReason::EntryNotFound,
            });
        };

        let summary = draft
            .meta
            .get("summary")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string();
        let is_strict = draft
            .meta
            .get("strict")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false);
        let platform = draft.platform;
        let limit = self.config.limit_for(platform);

        let mut content = if let Some(router) = self.active_router() {
            let prompt = format!(
                "Regenerate this {platform} draft as a fresh alternative. Keep under {limit} chars.\n\nDiary:\n{}\n\nSummary:\n{summary}\n\nPrevious draft:\n{}",
                entry.text, draft.content
            );
            match router
                .generate(
                    &self.store,
                    &self.config,
                    &stage_for(platform),
                    &prompt,
                    &self.style.system_prompt(),
                    json!({"entry_id": entry.id, "platform": platform, "regenerate_of": draft_id}),
                )
                .await
            {
                Ok(result) => result.text.trim().to_string(),
                Err(e) if is_generation_failure(&e) => {
                    deterministic_draft(platform, &summary, &entry.text, limit)
                }
                Err(e) => return Err(e),
            }
        } else {
            deterministic_draft(platform, &summary, &entry.text, limit)
        };

        let mut validation = validate(&content, limit);
        if !validation.ok {
            content = truncate_to_limit(&content, limit);
            validation = validate(&content, limit);
        }

        self.store
            .update_draft_status(draft_id, DraftStatus::Rejected, draft.scheduled_at)
            .await?;
        let new_draft = self
            .store
            .create_draft(NewDraft {
                entry_id: entry.id,
                platform,
                content,
                status: DraftStatus::Pending,
                scheduled_at: None,
                meta: json!({
                    "summary": summary,
                    "strict": is_strict,
                    "regenerated_from": draft_id,
                    "validation": validation.to_value(),
                }),
            })
            .await?;
        self.store
            .record_undo(
                user_id,
                &UndoPayload::DraftCreate {
                    draft_id: new_draft.id,
                },
            )
            .await?;
        info!(old = draft_id, new = new_draft.id, "draft regenerated");
        Ok(DraftOutcome::Updated {
            draft: new_draft,
            validation: Some(validation),
        })
    }

    /// Replace a draft's content with human-supplied text.
    ///
    /// The replacement is truncated to the platform limit; the old draft
    /// becomes `rejected` and a new pending version references it.
    #[instrument(skip(self, replacement_text))]
    pub async fn edit_draft(
        &self,
        user_id: &str,
        draft_id: i64,
        replacement_text: &str,
    ) -> VasariResult<DraftOutcome> {
        let Some(old) = self.store.draft(draft_id).await? else {
            return Ok(DraftOutcome::Rejected {
                reason: RejectReason::DraftNotFound,
            });
        };

        let platform = old.platform;
        let limit = self.config.limit_for(platform);
        let content = truncate_to_limit(replacement_text.trim(), limit);
        let validation = validate(&content, limit);

        self.store
            .update_draft_status(draft_id, DraftStatus::Rejected, old.scheduled_at)
            .await?;
        let new_draft = self
            .store
            .create_draft(NewDraft {
                entry_id: old.entry_id,
                platform,
                content,
                status: DraftStatus::Pending,
                scheduled_at: None,
                meta: json!({
                    "edited_from": draft_id,
                    "validation": validation.to_value(),
                }),
            })
            .await?;
        self.store
            .record_undo(
                user_id,
                &UndoPayload::DraftCreate {
                    draft_id: new_draft.id,
                },
            )
            .await?;
        Ok(DraftOutcome::Updated {
            draft: new_draft,
            validation: Some(validation),
        })
    }

    /// Schedule a draft for publication at a given time, recording the
    /// prior status for undo.
    #[instrument(skip(self))]
    pub async fn schedule_draft(
        &self,
        user_id: &str,
        draft_id: i64,
        scheduled_at: DateTime<Utc>,
    ) -> VasariResult<DraftOutcome> {
        let Some(draft) = self.store.draft(draft_id).await? else {
            return Ok(DraftOutcome::Rejected {
                reason: RejectReason::DraftNotFound,
            });
        };

        let Some(updated) = self
            .store
            .update_draft_status(draft_id, DraftStatus::Scheduled, Some(scheduled_at))
            .await?
        else {
            return Ok(DraftOutcome::Rejected {
                reason: RejectReason::DraftNotFound,
            });
        };
        self.store
            .record_undo(
                user_id,
                &UndoPayload::DraftStatusUpdate {
                    draft_id,
                    previous_status: draft.status,
                    previous_scheduled_at: draft.scheduled_at,
                },
            )
            .await?;
        info!(draft_id, %scheduled_at, "draft scheduled");
        Ok(DraftOutcome::Updated {
            draft: updated,
            validation: None,
        })
    }

    // -- publishing -------------------------------------------------------

    /// The effective dry-run flag: a stored global override wins over the
    /// static configuration default.
    pub async fn effective_dry_run(&self) -> VasariResult<bool> {
        let setting = self.store.global_setting("dry_run").await?;
        Ok(setting
            .and_then(|v| v.as_bool())
            .unwrap_or(self.config.modes.dry_run))
    }

    /// Set the per-deployment dry-run override.
    pub async fn set_dry_run(&self, value: bool) -> VasariResult<()> {
        self.store.set_global_setting("dry_run", json!(value)).await
    }

    /// Publish one draft through the gate.
    ///
    /// Preconditions are checked in order: approval (unless forced),
    /// revalidation against the current limit, a registered publisher, and
    /// the rolling publish cap. The draft is then locked into `publishing`
    /// with an atomic conditional transition so a concurrent attempt cannot
    /// double-publish; on success it becomes `published`, on client failure
    /// the failure is logged and the prior status restored so the draft
    /// stays retryable.
    #[instrument(skip(self, publishers))]
    pub async fn publish_draft(
        &self,
        draft_id: i64,
        publishers: &PublisherRegistry,
        force: bool,
    ) -> VasariResult<PublishOutcome> {
        let Some(draft) = self.store.draft(draft_id).await? else {
            return Ok(PublishOutcome::Rejected {
                draft_id: Some(draft_id),
                platform: None,
                reason: RejectReason::DraftNotFound,
                validation: None,
            });
        };
        let platform = draft.platform;

        if self.config.modes.approval_required
            && !force
            && !matches!(draft.status, DraftStatus::Approved | DraftStatus::Scheduled)
        {
            return Ok(PublishOutcome::Rejected {
                draft_id: Some(draft.id),
                platform: Some(platform),
                reason: RejectReason::ApprovalRequired,
                validation: None,
            });
        }
        if draft.status == DraftStatus::Publishing {
            return Ok(PublishOutcome::Rejected {
                draft_id: Some(draft.id),
                platform: Some(platform),
                reason: RejectReason::AlreadyPublishing,
                validation: None,
            });
        }

        // Defense against stale or hand-edited content.
        let limit = self.config.limit_for(platform);
        let validation = validate(&draft.content, limit);
        if !validation.ok {
            return Ok(PublishOutcome::Rejected {
                draft_id: Some(draft.id),
                platform: Some(platform),
                reason: RejectReason::InvalidDraft,
                validation: Some(validation),
            });
        }

        let dry_run = self.effective_dry_run().await?;
        let Some(publisher) = publishers.get(platform) else {
            return Ok(PublishOutcome::Rejected {
                draft_id: Some(draft.id),
                platform: Some(platform),
                reason: RejectReason::MissingPlatformClient,
                validation: None,
            });
        };

        if let Some(cap) = self.config.cap_for(platform) {
            let since = Utc::now() - Duration::days(CAP_WINDOW_DAYS);
            let recent = self
                .store
                .count_publish_successes_since(platform, since)
                .await?;
            if recent >= u64::from(cap) {
                info!(%platform, cap, recent, "publish cap reached");
                return Ok(PublishOutcome::Rejected {
                    draft_id: Some(draft.id),
                    platform: Some(platform),
                    reason: RejectReason::CapExceeded,
                    validation: None,
                });
            }
        }

        // Take the publish lock. Losing the race means another attempt
        // already moved the draft out of the status we observed.
        if self
            .store
            .transition_draft_status(draft.id, &[draft.status], DraftStatus::Publishing)
            .await?
            .is_none()
        {
            return Ok(PublishOutcome::Rejected {
                draft_id: Some(draft.id),
                platform: Some(platform),
                reason: RejectReason::AlreadyPublishing,
                validation: None,
            });
        }

        match publisher.publish(&draft.content, dry_run).await {
            Ok(receipt) => {
                self.store
                    .record_publish(NewPublishLog {
                        draft_id: draft.id,
                        platform,
                        success: true,
                        response: serde_json::to_value(&receipt).unwrap_or(JsonValue::Null),
                        error: None,
                    })
                    .await?;
                self.store
                    .update_draft_status(draft.id, DraftStatus::Published, None)
                    .await?;
                info!(draft_id = draft.id, %platform, dry_run, "draft published");
                Ok(PublishOutcome::Published {
                    draft_id: draft.id,
                    platform,
                    dry_run,
                    receipt,
                })
            }
            Err(e) => {
                let error = e.to_string();
                self.store
                    .record_publish(NewPublishLog {
                        draft_id: draft.id,
                        platform,
                        success: false,
                        response: JsonValue::Null,
                        error: Some(error.clone()),
                    })
                    .await?;
                // Release the lock so the draft stays retryable.
                self.store
                    .update_draft_status(draft.id, draft.status, draft.scheduled_at)
                    .await?;
                warn!(draft_id = draft.id, %platform, error = %error, "publish failed");
                Ok(PublishOutcome::Failed {
                    draft_id: draft.id,
                    platform,
                    dry_run,
                    error,
                })
            }
        }
    }

    /// Publish every approved draft for a user, aggregating per-draft
    /// outcomes without short-circuiting on failure.
    pub async fn publish_approved_queue(
        &self,
        user_id: &str,
        publishers: &PublisherRegistry,
    ) -> VasariResult<QueueOutcome> {
        let drafts = self.store.approved_drafts(Some(user_id)).await?;
        let mut results = Vec::with_capacity(drafts.len());
        for draft in drafts {
            results.push(self.publish_draft(draft.id, publishers, false).await?);
        }
        Ok(QueueOutcome { results })
    }

    /// Publish every scheduled draft due at or before `now`, forcing past
    /// the approval gate (scheduling already implied approval intent). A
    /// failed attempt leaves the draft scheduled for the next sweep.
    #[instrument(skip(self, publishers))]
    pub async fn run_scheduler_once(
        &self,
        now: DateTime<Utc>,
        publishers: &PublisherRegistry,
    ) -> VasariResult<SweepOutcome> {
        let due = self.store.due_scheduled_drafts(now).await?;
        let mut results = Vec::with_capacity(due.len());
        for draft in due {
            results.push(self.publish_draft(draft.id, publishers, true).await?);
        }
        Ok(SweepOutcome {
            count: results.len(),
            results,
        })
    }

    // -- queries ----------------------------------------------------------

    /// Pending drafts for a user, newest first.
    pub async fn list_queue(&self, user_id: &str, limit: usize) -> VasariResult<Vec<Draft>> {
        self.store.pending_drafts(user_id, limit).await
    }

    /// Current deployment status: dry-run flag, generation spend, and the
    /// most recent publish attempt.
    pub async fn status_snapshot(&self) -> VasariResult<StatusSnapshot> {
        Ok(StatusSnapshot {
            dry_run: self.effective_dry_run().await?,
            costs: self.store.cost_summary().await?,
            last_publish: self.store.last_publish_attempt().await?,
        })
    }

    // -- capture ----------------------------------------------------------

    /// Start (or reset) a multi-message capture session for a user.
    pub async fn start_capture(&self, user_id: &str) -> VasariResult<CaptureSession> {
        self.store.start_capture(user_id).await
    }

    /// Append a chunk to the user's active capture session.
    pub async fn append_capture(
        &self,
        user_id: &str,
        chunk: &str,
    ) -> VasariResult<Option<CaptureSession>> {
        self.store.append_capture(user_id, chunk).await
    }

    /// End the user's capture session and ingest the buffered text as an
    /// entry. Rejects when no session is active; the buffer then flows
    /// through the normal ingestion checks.
    pub async fn finish_capture(
        &self,
        user_id: &str,
        flags: JsonValue,
        source: &str,
    ) -> VasariResult<IngestOutcome> {
        let Some(session) = self.store.end_capture(user_id).await? else {
            return Ok(IngestOutcome::Rejected {
                reason: RejectReason::NoActiveSession,
                existing: None,
            });
        };
        self.ingest_entry(user_id, &session.buffer, flags, source)
            .await
    }

    // -- undo -------------------------------------------------------------

    /// Revert the user's most recent reversible action.
    ///
    /// Unrecognized action types are reported without marking the record
    /// undone, so nothing is ever silently dropped from the log.
    #[instrument(skip(self))]
    pub async fn undo_last_action(&self, user_id: &str) -> VasariResult<UndoOutcome> {
        let Some(action) = self.store.last_undo(user_id).await? else {
            return Ok(UndoOutcome::Rejected {
                reason: RejectReason::NothingToUndo,
                action: None,
            });
        };

        let payload: UndoPayload = match serde_json::from_value(action.payload.clone()) {
            Ok(payload) => payload,
            Err(_) => {
                warn!(action = %action.action, "unsupported undo action left in log");
                return Ok(UndoOutcome::Rejected {
                    reason: RejectReason::UnsupportedUndoAction,
                    action: Some(action.action),
                });
            }
        };

        match payload {
            UndoPayload::EntryCreate { entry_id } => {
                self.store.delete_entry(entry_id).await?;
            }
            UndoPayload::DraftCreate { draft_id } => {
                self.store.delete_draft(draft_id).await?;
            }
            UndoPayload::DraftStatusUpdate {
                draft_id,
                previous_status,
                previous_scheduled_at,
            } => {
                self.store
                    .update_draft_status(draft_id, previous_status, previous_scheduled_at)
                    .await?;
            }
        }
        self.store.mark_undo_done(action.id).await?;
        info!(action = %action.action, "action undone");
        Ok(UndoOutcome::Undone {
            action: action.action,
        })
    }
}
