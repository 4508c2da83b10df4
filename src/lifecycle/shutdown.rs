//! Shutdown coordination.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Wraps a broadcast channel: the server's serve loop and any helper task
/// subscribe, and a single `trigger` tears all of them down. Integration
/// tests use this to stop servers they spawned.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal. Safe to call with no subscribers.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve when either the broadcast signal fires or the process receives
/// ctrl-c. Used as the graceful-shutdown future of the serve loop.
pub async fn wait(mut rx: broadcast::Receiver<()>) {
    tokio::select! {
        _ = rx.recv() => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(error) = result {
                tracing::error!(error = %error, "Failed to listen for ctrl-c");
            }
        }
    }
    tracing::info!("Shutdown signal received");
}
