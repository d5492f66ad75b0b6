//! Cancel-and-restart coalescing of rapid edits

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Holds back pushed values until no newer value arrives for a full window.
///
/// Only the value that survives the window undisturbed is delivered by
/// [`Debouncer::settled`]. Must be used inside a tokio runtime.
pub struct Debouncer<T> {
    window: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<(u64, T)>,
    rx: mpsc::UnboundedReceiver<(u64, T)>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            window,
            generation: 0,
            pending: None,
            tx,
            rx,
        }
    }

    /// Start (or restart) the window for `value`, discarding any pending value
    pub fn push(&mut self, value: T) {
        self.cancel();

        let generation = self.generation;
        let tx = self.tx.clone();
        let window = self.window;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let _ = tx.send((generation, value));
        }));
    }

    /// Drop the pending value, if any
    pub fn cancel(&mut self) {
        // A timer that already fired may have queued its value; bumping the
        // generation makes `settled` skip it.
        self.generation += 1;
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True from `push` until the value is taken by `settled` or dropped by `cancel`
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for the next value that survived its window
    pub async fn settled(&mut self) -> Option<T> {
        loop {
            let (generation, value) = self.rx.recv().await?;
            if generation == self.generation {
                self.pending = None;
                return Some(value);
            }
            tracing::trace!("[Debouncer] Skipping superseded value");
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
