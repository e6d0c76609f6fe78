//! Core data types for the Vasari drafting pipeline.
//!
//! This crate provides the foundation data types used across all Vasari
//! interfaces: the platform and status enumerations, the persisted records
//! (entries, drafts, logs), generation request/result shapes, the content
//! validator, normalized content hashing, and the configuration model.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod generation;
mod hash;
mod platform;
mod record;
mod status;
mod validate;

pub use config::{
    LlmSettings, Modes, PlatformLimits, PlatformToggles, Pricing, Route, SchedulerSettings,
    VasariConfig,
};
pub use generation::{
    GenerationRequest, GenerationRequestBuilder, GenerationResult, PublishReceipt,
};
pub use hash::hash_text;
pub use platform::Platform;
pub use record::{
    CaptureSession, CostSummary, Draft, Entry, LlmCall, NewDraft, NewEntry, NewLlmCall,
    NewPublishLog, PublishLog, UndoAction, UndoPayload, UserState,
};
pub use status::DraftStatus;
pub use validate::{Validation, truncate_to_limit, validate};
