//! Stop signal shared by the accept loop and connection tasks.
//!
//! The server subscribes once when it starts and hands each connection a
//! resubscribed receiver, so a single `trigger` stops accepting and closes
//! every open connection at its next read.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

/// Handle that stops a running server. Clones share the same signal.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        // One slot: the signal is only ever sent once.
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscriber. Returns how many were listening.
    ///
    /// Only the first call sends; later calls return 0.
    pub fn trigger(&self) -> usize {
        if self.triggered.swap(true, Ordering::SeqCst) {
            return 0;
        }
        self.tx.send(()).unwrap_or(0)
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trigger_reaches_every_subscriber_once() {
        let shutdown = Shutdown::new();
        let mut accept_loop = shutdown.subscribe();
        let mut connection = accept_loop.resubscribe();
        assert_eq!(shutdown.receiver_count(), 2);

        assert_eq!(shutdown.clone().trigger(), 2);
        assert!(shutdown.is_triggered());
        assert!(accept_loop.recv().await.is_ok());
        assert!(connection.recv().await.is_ok());

        assert_eq!(shutdown.trigger(), 0);
        assert!(accept_loop.try_recv().is_err());
    }

    #[test]
    fn trigger_without_subscribers_reaches_nobody() {
        let shutdown = Shutdown::default();
        assert!(!shutdown.is_triggered());
        assert_eq!(shutdown.trigger(), 0);
        assert!(shutdown.is_triggered());
    }
}
