// src/utils/shutdown.rs

//! Cooperative cancellation token.
//!
//! The runner races this token against its inter-cycle sleep, and the
//! listing extractor checks it between detail fetches, so a stop
//! signal takes effect promptly instead of only between cycles.

use tokio::sync::watch;

/// Sender side; triggering it cancels every [`Shutdown`] clone.
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    /// Signal shutdown to all receivers.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

/// Receiver side, cloned into everything that must stop cooperatively.
#[derive(Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// Whether shutdown has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once shutdown is requested.
    ///
    /// If the handle is dropped without triggering, this never
    /// resolves; the process then stops on its own terms.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    /// A token that never fires, for one-shot invocations.
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        // Leak the sender so the channel stays open.
        std::mem::forget(tx);
        Self { rx }
    }
}

/// Create a linked handle/token pair.
pub fn channel() -> (ShutdownHandle, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, Shutdown { rx })
}
