//! Platform publishers for Vasari.
//!
//! Three platform clients implement the
//! [`PlatformPublisher`](vasari_interface::PlatformPublisher) capability:
//! X (tweet creation), Threads (two-step container create then publish),
//! and LinkedIn (UGC posts). Every client honors dry-run mode: a dry-run
//! publish performs no network I/O, always succeeds, and returns a
//! simulated receipt.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod linkedin;
mod threads;
mod x;

pub use linkedin::LinkedInPublisher;
pub use threads::ThreadsPublisher;
pub use x::XPublisher;

use uuid::Uuid;
use vasari_core::{Platform, PublishReceipt};

/// Seconds allowed for each platform HTTP call.
pub(crate) const PUBLISH_TIMEOUT_SECS: u64 = 20;

/// Simulated receipt shared by all publishers in dry-run mode.
pub(crate) fn dry_run_receipt(platform: Platform) -> PublishReceipt {
    PublishReceipt {
        platform,
        dry_run: true,
        payload: serde_json::json!({
            "simulated_id": format!("dryrun-{platform}-{}", Uuid::new_v4().simple()),
        }),
    }
}
