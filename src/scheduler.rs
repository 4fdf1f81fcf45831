use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time;

/// One-shot timer bookkeeping: at most one pending delayed callback per
/// reminder id. Recurrence is achieved by re-arming after each firing, never
/// by a repeating timer, so a snooze can replace the next firing cleanly.
///
/// Operations are synchronous; the armed sleep is the only async boundary.
pub(crate) struct TimerRegistry {
    runtime: Handle,
    timers: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl TimerRegistry {
    /// Must be called from within a Tokio runtime.
    pub fn new() -> Self {
        Self {
            runtime: Handle::current(),
            timers: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, JoinHandle<()>>> {
        self.timers.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Arm a one-shot timer for `id`, replacing any pending one.
    pub fn arm<F>(&self, id: &str, delay: Duration, on_fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel(id);
        let handle = self.runtime.spawn(async move {
            time::sleep(delay).await;
            on_fire();
        });
        self.lock().insert(id.to_string(), handle);
    }

    /// Abort any pending timer for `id`. Idempotent.
    pub fn cancel(&self, id: &str) {
        if let Some(handle) = self.lock().remove(id) {
            handle.abort();
        }
    }

    pub fn is_armed(&self, id: &str) -> bool {
        self.lock().get(id).map_or(false, |h| !h.is_finished())
    }

    pub fn armed_count(&self) -> usize {
        self.lock().values().filter(|h| !h.is_finished()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_armed_timer_fires_once() {
        let registry = TimerRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        registry.arm("r1", Duration::from_secs(60), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(registry.is_armed("r1"));

        time::sleep(Duration::from_secs(61)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!registry.is_armed("r1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearming_replaces_pending_timer() {
        let registry = TimerRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let counter = fired.clone();
            registry.arm("r1", Duration::from_secs(60), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(registry.armed_count(), 1);

        time::sleep(Duration::from_secs(61)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let registry = TimerRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        registry.arm("r1", Duration::from_secs(60), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        registry.cancel("r1");
        // Canceling again is a no-op
        registry.cancel("r1");

        time::sleep(Duration::from_secs(120)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(registry.armed_count(), 0);
    }
}
