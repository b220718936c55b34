//! Cancel-and-replace deferred calls.

use fieldguard_log::{trace, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// A single slot for one deferred call.
///
/// Scheduling aborts whatever is pending and starts a fresh delay, so of
/// a burst of calls only the last one runs, `delay` after it was made.
/// Each scheduled call also carries a ticket; a call whose ticket is no
/// longer current never runs, even if its timer already fired.
#[derive(Default)]
pub struct Debouncer {
    pending: Mutex<Option<JoinHandle<()>>>,
    ticket: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any pending call with `task`, run after `delay`.
    ///
    /// Returns false (and drops `task`) when called outside a tokio runtime.
    pub fn schedule<F>(&self, delay: Duration, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let Ok(runtime) = Handle::try_current() else {
            warn!("No async runtime available, deferred call dropped");
            return false;
        };

        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let deadline = Instant::now() + delay;
        let ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let current = self.ticket.clone();
        *pending = Some(runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if current.load(Ordering::SeqCst) == ticket {
                task();
            }
        }));

        trace!("Deferred call {} scheduled in {:?}", ticket, delay);
        true
    }

    /// Drop the pending call. Returns whether one was still waiting.
    pub fn cancel(&self) -> bool {
        self.ticket.fetch_add(1, Ordering::SeqCst);
        match self.pending.lock().take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> Box<dyn FnOnce() + Send>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let shared = hits.clone();
        let make = move || -> Box<dyn FnOnce() + Send> {
            let hits = shared.clone();
            Box::new(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };
        (hits, make)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_once_after_last_call() {
        let debouncer = Debouncer::new();
        let (hits, make) = counter();

        for _ in 0..5 {
            assert!(debouncer.schedule(Duration::from_millis(700), make()));
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        // 300ms have passed since the last call; 400 more to go
        tokio::time::sleep(Duration::from_millis(399)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_calls_each_run() {
        let debouncer = Debouncer::new();
        let (hits, make) = counter();

        debouncer.schedule(Duration::from_millis(100), make());
        tokio::time::sleep(Duration::from_millis(150)).await;
        debouncer.schedule(Duration::from_millis(100), make());
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let debouncer = Debouncer::new();
        let (hits, make) = counter();

        debouncer.schedule(Duration::from_millis(100), make());
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_schedule_without_runtime() {
        let debouncer = Debouncer::new();
        let (hits, make) = counter();

        assert!(!debouncer.schedule(Duration::from_millis(1), make()));
        assert!(!debouncer.is_pending());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
