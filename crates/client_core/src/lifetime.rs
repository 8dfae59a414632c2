//! Cancellation scope tied to a screen controller.

use std::{future::Future, sync::Arc};

use tokio::sync::watch;

/// Owned by a controller; cancels every outstanding action when dropped.
pub struct Lifetime {
    handle: LifetimeHandle,
}

/// Cloneable view of a [`Lifetime`] used to cancel it from another task.
#[derive(Clone)]
pub struct LifetimeHandle {
    cancelled: Arc<watch::Sender<bool>>,
}

impl Lifetime {
    pub fn new() -> Self {
        let (cancelled, _) = watch::channel(false);
        Self {
            handle: LifetimeHandle {
                cancelled: Arc::new(cancelled),
            },
        }
    }

    pub fn handle(&self) -> LifetimeHandle {
        self.handle.clone()
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Lifetime {
    fn drop(&mut self) {
        self.handle.cancel();
    }
}

impl LifetimeHandle {
    pub fn cancel(&self) {
        self.cancelled.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    pub async fn cancelled(&self) {
        let mut rx = self.cancelled.subscribe();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            // Sender outlives every handle.
            std::future::pending::<()>().await;
        }
    }

    /// Drives `fut` unless the lifetime is cancelled first. A cancelled lifetime never polls it.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        if self.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.cancelled() => None,
            output = fut => Some(output),
        }
    }
}

#[cfg(test)]
#[path = "tests/lifetime_tests.rs"]
mod tests;
