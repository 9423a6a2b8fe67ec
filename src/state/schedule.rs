use std::sync::Mutex;

/// Handle for a scheduled task, used to cancel it before it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub(crate) u64);

/// One-shot timer abstraction behind notification auto-dismissal.
///
/// Cancelling an id that already fired (or was never issued) is a no-op, so
/// callers don't need to track firing state themselves.
pub trait TaskScheduler: Send + Sync {
    /// Milliseconds on this scheduler's clock. The browser impl reads wall
    /// time; the manual impl reads the simulated clock.
    fn now_ms(&self) -> u64;
    fn schedule(&self, delay_ms: u64, task: Box<dyn FnOnce() + Send>) -> TaskId;
    fn cancel(&self, id: TaskId);
}

struct PendingTask {
    id: u64,
    due_ms: u64,
    task: Box<dyn FnOnce() + Send>,
}

#[derive(Default)]
struct ManualState {
    now_ms: u64,
    next_id: u64,
    pending: Vec<PendingTask>,
}

/// Deterministic scheduler driven by explicit clock advancement.
///
/// Used on the server (where timers never get a chance to fire during a
/// render pass) and in tests, where `advance_to` simulates the passage of
/// time and fires due tasks in due-time order.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the simulated clock, firing every task due on the way.
    ///
    /// Tasks run outside the internal lock so they may schedule or cancel
    /// further tasks; a task scheduled within the advanced window fires in
    /// the same call.
    pub fn advance_to(&self, target_ms: u64) {
        loop {
            let next = {
                let mut state = self.state.lock().expect("scheduler lock poisoned");
                let due_idx = state
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due_ms <= target_ms)
                    .min_by_key(|(_, t)| (t.due_ms, t.id))
                    .map(|(idx, _)| idx);
                match due_idx {
                    Some(idx) => {
                        let task = state.pending.remove(idx);
                        state.now_ms = state.now_ms.max(task.due_ms);
                        task
                    }
                    None => {
                        state.now_ms = state.now_ms.max(target_ms);
                        break;
                    }
                }
            };
            (next.task)();
        }
    }

    pub fn advance(&self, delta_ms: u64) {
        let target = self.now_ms() + delta_ms;
        self.advance_to(target);
    }

    pub fn pending_count(&self) -> usize {
        self.state
            .lock()
            .expect("scheduler lock poisoned")
            .pending
            .len()
    }
}

impl TaskScheduler for ManualScheduler {
    fn now_ms(&self) -> u64 {
        self.state.lock().expect("scheduler lock poisoned").now_ms
    }

    fn schedule(&self, delay_ms: u64, task: Box<dyn FnOnce() + Send>) -> TaskId {
        let mut state = self.state.lock().expect("scheduler lock poisoned");
        let id = state.next_id;
        state.next_id += 1;
        let due_ms = state.now_ms + delay_ms;
        state.pending.push(PendingTask { id, due_ms, task });
        TaskId(id)
    }

    fn cancel(&self, id: TaskId) {
        let mut state = self.state.lock().expect("scheduler lock poisoned");
        state.pending.retain(|t| t.id != id.0);
    }
}

#[cfg(feature = "hydrate")]
pub use browser::TimeoutScheduler;

#[cfg(feature = "hydrate")]
mod browser {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use leptos::leptos_dom::helpers::{set_timeout_with_handle, TimeoutHandle};

    use super::{TaskId, TaskScheduler};

    /// `window.setTimeout`-backed scheduler for the hydrated client.
    #[derive(Default)]
    pub struct TimeoutScheduler {
        next_id: AtomicU64,
        handles: Arc<Mutex<HashMap<u64, TimeoutHandle>>>,
    }

    impl TimeoutScheduler {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl TaskScheduler for TimeoutScheduler {
        fn now_ms(&self) -> u64 {
            chrono::Utc::now().timestamp_millis().max(0) as u64
        }

        fn schedule(&self, delay_ms: u64, task: Box<dyn FnOnce() + Send>) -> TaskId {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            let handles = Arc::clone(&self.handles);
            let callback = move || {
                // The handle is gone the moment the timer fires; a later
                // cancel for this id must not clear an unrelated timeout.
                handles
                    .lock()
                    .expect("timer handle lock poisoned")
                    .remove(&id);
                task();
            };
            match set_timeout_with_handle(callback, Duration::from_millis(delay_ms)) {
                Ok(handle) => {
                    self.handles
                        .lock()
                        .expect("timer handle lock poisoned")
                        .insert(id, handle);
                }
                Err(err) => log::error!("failed to schedule timeout: {err:?}"),
            }
            TaskId(id)
        }

        fn cancel(&self, id: TaskId) {
            let handle = self
                .handles
                .lock()
                .expect("timer handle lock poisoned")
                .remove(&id.0);
            if let Some(handle) = handle {
                handle.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn tasks_fire_in_due_order() {
        let scheduler = ManualScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for (label, delay) in [("b", 200u64), ("a", 100), ("c", 300)] {
            let log = Arc::clone(&log);
            scheduler.schedule(delay, Box::new(move || log.lock().unwrap().push(label)));
        }
        scheduler.advance_to(1_000);
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn task_does_not_fire_before_due_time() {
        let scheduler = ManualScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        scheduler.schedule(4_000, Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        scheduler.advance_to(3_999);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        scheduler.advance_to(4_001);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancelled_task_never_fires() {
        let scheduler = ManualScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let id = scheduler.schedule(100, Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        scheduler.cancel(id);
        scheduler.advance_to(1_000);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn cancel_after_fire_is_noop() {
        let scheduler = ManualScheduler::new();
        let id = scheduler.schedule(10, Box::new(|| {}));
        scheduler.advance_to(20);
        scheduler.cancel(id);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn task_scheduled_during_advance_fires_in_same_window() {
        let scheduler = Arc::new(ManualScheduler::new());
        let fired = Arc::new(AtomicUsize::new(0));

        let inner_sched = Arc::clone(&scheduler);
        let inner_fired = Arc::clone(&fired);
        scheduler.schedule(100, Box::new(move || {
            let counter = Arc::clone(&inner_fired);
            inner_sched.schedule(50, Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }));

        scheduler.advance_to(200);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.now_ms(), 200);
    }

    #[test]
    fn clock_never_moves_backwards() {
        let scheduler = ManualScheduler::new();
        scheduler.advance_to(500);
        scheduler.advance_to(100);
        assert_eq!(scheduler.now_ms(), 500);
    }
}
