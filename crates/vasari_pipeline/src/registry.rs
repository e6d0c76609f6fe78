//! Publisher registry mapping platforms to implementations.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use vasari_core::Platform;
use vasari_interface::PlatformPublisher;

/// Registry of platform publishers, keyed by [`Platform`].
///
/// The publish gate resolves the draft's platform through this registry; a
/// deployment registers only the platforms it has clients for, and publishes
/// to unregistered platforms are rejected rather than attempted.
#[derive(Clone, Default)]
pub struct PublisherRegistry {
    publishers: HashMap<Platform, Arc<dyn PlatformPublisher>>,
}

impl PublisherRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a publisher under its own platform.
    pub fn register(&mut self, publisher: Arc<dyn PlatformPublisher>) {
        debug!(platform = %publisher.platform(), "registering platform publisher");
        self.publishers.insert(publisher.platform(), publisher);
    }

    /// Resolve a publisher by platform.
    pub fn get(&self, platform: Platform) -> Option<Arc<dyn PlatformPublisher>> {
        self.publishers.get(&platform).cloned()
    }

    /// Registered platforms, in canonical order.
    pub fn platforms(&self) -> Vec<Platform> {
        let mut platforms: Vec<_> = self.publishers.keys().copied().collect();
        platforms.sort_unstable();
        platforms
    }
}

impl std::fmt::Debug for PublisherRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublisherRegistry")
            .field("publishers", &self.platforms())
            .finish()
    }
}
