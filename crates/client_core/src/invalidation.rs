use tokio::sync::broadcast;
use tracing::debug;

const INVALIDATION_CHANNEL_CAPACITY: usize = 64;

/// A dashboard listing whose cached rendering is stale and must be read fresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalidation {
    pub path: String,
}

/// Fire-and-forget stale-view signal.
///
/// Senders never wait for subscribers; with nobody listening the signal is dropped.
#[derive(Debug, Clone)]
pub struct Invalidations {
    events: broadcast::Sender<Invalidation>,
}

impl Invalidations {
    pub fn new(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self { events }
    }

    pub fn revalidate_path(&self, path: &str) {
        debug!(path, "invalidation: listing marked stale");
        let _ = self.events.send(Invalidation {
            path: path.to_string(),
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.events.subscribe()
    }
}

impl Default for Invalidations {
    fn default() -> Self {
        Self::new(INVALIDATION_CHANNEL_CAPACITY)
    }
}
