//! In-memory reference implementation of the Vasari [`Store`] capability.
//!
//! The relational engine itself is outside this workspace's scope; what the
//! orchestrator needs is the capability described by `vasari_interface::Store`.
//! `MemoryStore` implements it completely (dedupe uniqueness, entry-to-draft
//! cascade deletes, per-`(entry, platform)` draft versioning, append-only
//! logs, ordered due-draft retrieval, and the atomic conditional status
//! transition backing the publish lock) and is what the tests and any
//! single-process deployment run against.
//!
//! [`Store`]: vasari_interface::Store

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;

pub use memory::MemoryStore;
