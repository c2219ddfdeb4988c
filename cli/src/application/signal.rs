//! One-shot "bootstrapped" event.
//!
//! Set once by the orchestrator when the controller/model is ready. Later
//! `set` calls are no-ops, so downstream waiters never fire twice.

use tokio::sync::watch;

#[derive(Debug)]
pub struct BootstrapSignal {
    tx: watch::Sender<bool>,
}

impl Default for BootstrapSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl BootstrapSignal {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Fire the event. Returns `true` only for the call that fired it.
    pub fn set(&self) -> bool {
        self.tx.send_if_modified(|fired| {
            if *fired {
                false
            } else {
                *fired = true;
                true
            }
        })
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        *self.tx.borrow()
    }

    /// Receiver that observes the event; `changed()` resolves once on firing.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Wait until the event has fired.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|fired| *fired).await;
    }
}
