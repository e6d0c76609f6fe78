//! Draft lifecycle orchestration for the Vasari pipeline.
//!
//! This crate hosts the state machine that turns ingested diary entries
//! into platform-tailored drafts, runs them through human approval, and
//! publishes the approved ones: the [`Pipeline`] orchestrator, the
//! [`PublisherRegistry`] it publishes through, the [`StyleSheet`] driving
//! prompt construction, the [`SchedulerRunner`] sweeping due scheduled
//! drafts, and the structured outcome types every operation returns.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod format;
mod outcome;
mod pipeline;
mod prompts;
mod registry;
mod scheduler;

pub use format::format_draft_message;
pub use outcome::{
    DraftOutcome, GenerateOutcome, GeneratedDraft, IngestOutcome, PublishOutcome, QueueOutcome,
    RejectReason, StatusSnapshot, Summary, SweepOutcome, UndoOutcome,
};
pub use pipeline::Pipeline;
pub use prompts::StyleSheet;
pub use registry::PublisherRegistry;
pub use scheduler::{SchedulerRunner, parse_user_datetime};
