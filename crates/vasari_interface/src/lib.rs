//! Capability traits consumed by the Vasari orchestrator.
//!
//! Three seams are defined here: generation providers, platform publishers,
//! and the persistence store. Concrete implementations live in
//! `vasari_models`, `vasari_social`, and `vasari_storage`; the orchestrator
//! only sees these traits.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{GenerationProvider, PlatformPublisher, Store};
