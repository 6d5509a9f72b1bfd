//! Push notification channel
//!
//! Browsers hold a WebSocket open on the push port; any message they get
//! means "reload the page". [`Reloader`] is the sending half handed to the
//! file watcher and signal handler.

pub mod server;

pub use server::serve_push;

use tokio::sync::broadcast;

/// Text frame sent to clients on reload
pub const RELOAD_MESSAGE: &str = "reload";

// Reload signals carry no data; a lagging client only needs one of them
const CHANNEL_CAPACITY: usize = 16;

/// Cloneable handle broadcasting reload signals to connected clients
#[derive(Debug, Clone)]
pub struct Reloader {
    tx: broadcast::Sender<()>,
}

impl Reloader {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Signal every connected client to reload.
    ///
    /// Returns the number of clients the signal was queued for.
    pub fn broadcast_reload(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }

    /// Currently connected clients
    pub fn client_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }
}

impl Default for Reloader {
    fn default() -> Self {
        Self::new()
    }
}
