//! Shutdown coordination and the active-connection gauge.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::{watch, Notify};

/// How a stop request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Every in-flight connection finished within the grace period.
    Graceful,
    /// At least one connection had to be closed forcibly.
    Forced,
}

/// One-shot shutdown broadcast carrying the per-connection grace period.
///
/// A watch channel rather than a notify: a subscriber that arrives after
/// the trigger still observes it, so a connection accepted right at the
/// stop boundary cannot sleep through the signal.
pub(crate) struct ShutdownSignal {
    tx: watch::Sender<Option<Duration>>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Duration>> {
        self.tx.subscribe()
    }

    pub fn trigger(&self, grace: Duration) {
        // send_replace, not send: the value must stick even when no
        // subscriber exists yet (stop can race ahead of serve).
        let _ = self.tx.send_replace(Some(grace));
    }

    pub fn is_requested(&self) -> bool {
        self.tx.borrow().is_some()
    }
}

/// Counts live handling units and wakes the stopper when the last one
/// exits.
pub(crate) struct ConnectionGauge {
    active: AtomicUsize,
    force_closed: AtomicUsize,
    drained: Notify,
}

impl ConnectionGauge {
    pub fn new() -> Self {
        Self {
            active: AtomicUsize::new(0),
            force_closed: AtomicUsize::new(0),
            drained: Notify::new(),
        }
    }

    /// Register a connection; returns the count before this one.
    pub fn acquire(&self) -> usize {
        self.active.fetch_add(1, Ordering::SeqCst)
    }

    pub fn release(&self) {
        if self.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.drained.notify_waiters();
        }
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn record_forced(&self) {
        self.force_closed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn forced(&self) -> usize {
        self.force_closed.load(Ordering::SeqCst)
    }

    /// Wait until the gauge reaches zero, up to `deadline`.
    /// Returns false if connections were still live when it elapsed.
    pub async fn wait_drained(&self, deadline: Duration) -> bool {
        tokio::time::timeout(deadline, self.drained_to_zero())
            .await
            .is_ok()
    }

    async fn drained_to_zero(&self) {
        loop {
            // Register the waiter before reading the count, otherwise a
            // release landing in between is a lost wakeup.
            let notified = self.drained.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.active.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}
