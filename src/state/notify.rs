use std::sync::{Arc, Mutex};

use super::schedule::{TaskId, TaskScheduler};
use super::SubscriberId;

/// Default lifetime of a toast before it dismisses itself.
pub const DEFAULT_TOAST_DURATION_MS: u64 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Success => "✓",
            NotificationKind::Error => "✕",
            NotificationKind::Info => "ℹ",
            NotificationKind::Warning => "⚠",
        }
    }
}

/// Monotonic per-bus identifier; enqueues within the same synchronous batch
/// always get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at_ms: u64,
    /// `None` keeps the notification until it is dismissed by hand.
    pub duration_ms: Option<u64>,
}

type ChangeCallback = Arc<dyn Fn(&[Notification]) + Send + Sync>;

struct Entry {
    notification: Notification,
    timer: Option<TaskId>,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    next_subscriber: u64,
    disposed: bool,
    entries: Vec<Entry>,
    subscribers: Vec<(SubscriberId, ChangeCallback)>,
}

/// In-process publish/subscribe queue for transient user-facing messages.
///
/// Entries keep insertion order regardless of duration; removal (manual or
/// timed) is idempotent and never reorders what remains. Auto-dismiss timers
/// run through the injected [`TaskScheduler`] so manual dismissal can cancel
/// them and `dispose` can clear every outstanding one.
#[derive(Clone)]
pub struct NotificationBus {
    inner: Arc<Mutex<BusInner>>,
    scheduler: Arc<dyn TaskScheduler>,
}

impl NotificationBus {
    pub fn new(scheduler: Arc<dyn TaskScheduler>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BusInner::default())),
            scheduler,
        }
    }

    pub fn enqueue(&self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        self.enqueue_with_duration(message, kind, Some(DEFAULT_TOAST_DURATION_MS))
    }

    /// Add a notification; `duration_ms: None` makes it sticky. Message
    /// content is not validated — an empty string is rendered as-is.
    pub fn enqueue_with_duration(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        duration_ms: Option<u64>,
    ) -> NotificationId {
        let message = message.into();
        let id = {
            let mut inner = self.lock();
            let id = NotificationId(inner.next_id);
            inner.next_id += 1;
            if inner.disposed {
                log::debug!("notification after teardown dropped: {message:?}");
                return id;
            }
            inner.entries.push(Entry {
                notification: Notification {
                    id,
                    message,
                    kind,
                    created_at_ms: self.scheduler.now_ms(),
                    duration_ms,
                },
                timer: None,
            });
            id
        };

        if let Some(delay) = duration_ms {
            let bus = self.clone();
            let timer = self
                .scheduler
                .schedule(delay, Box::new(move || bus.expire(id)));
            let mut inner = self.lock();
            match inner.entries.iter_mut().find(|e| e.notification.id == id) {
                Some(entry) => entry.timer = Some(timer),
                // Dismissed between insert and timer attach.
                None => self.scheduler.cancel(timer),
            }
        }

        self.notify_change();
        id
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.enqueue(message, NotificationKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.enqueue(message, NotificationKind::Error)
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.enqueue(message, NotificationKind::Info)
    }

    pub fn warning(&self, message: impl Into<String>) -> NotificationId {
        self.enqueue(message, NotificationKind::Warning)
    }

    /// Remove a notification and cancel its pending timer. Unknown (or
    /// already removed) ids are a silent no-op.
    pub fn dismiss(&self, id: NotificationId) {
        self.remove(id, true);
    }

    /// Timer path: the timeout already fired, so there is nothing to cancel.
    fn expire(&self, id: NotificationId) {
        self.remove(id, false);
    }

    fn remove(&self, id: NotificationId, cancel_timer: bool) {
        let timer = {
            let mut inner = self.lock();
            let Some(idx) = inner.entries.iter().position(|e| e.notification.id == id) else {
                return;
            };
            inner.entries.remove(idx).timer
        };
        if cancel_timer {
            if let Some(timer) = timer {
                self.scheduler.cancel(timer);
            }
        }
        self.notify_change();
    }

    /// Current visible set, oldest first.
    pub fn list(&self) -> Vec<Notification> {
        self.lock()
            .entries
            .iter()
            .map(|e| e.notification.clone())
            .collect()
    }

    pub fn on_change(
        &self,
        callback: impl Fn(&[Notification]) + Send + Sync + 'static,
    ) -> SubscriberId {
        let mut inner = self.lock();
        let id = SubscriberId(inner.next_subscriber);
        inner.next_subscriber += 1;
        inner.subscribers.push((id, Arc::new(callback)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.lock().subscribers.retain(|(sub, _)| *sub != id);
    }

    /// Teardown: cancel every outstanding timer and drop all subscribers so
    /// nothing fires against a dismantled page.
    pub fn dispose(&self) {
        let timers: Vec<TaskId> = {
            let mut inner = self.lock();
            inner.disposed = true;
            inner.subscribers.clear();
            inner.entries.drain(..).filter_map(|e| e.timer).collect()
        };
        for timer in timers {
            self.scheduler.cancel(timer);
        }
    }

    fn notify_change(&self) {
        // Snapshot under the lock, call back outside it: a subscriber is
        // allowed to call `list`/`dismiss` re-entrantly.
        let (subscribers, snapshot) = {
            let inner = self.lock();
            if inner.subscribers.is_empty() {
                return;
            }
            let snapshot: Vec<Notification> = inner
                .entries
                .iter()
                .map(|e| e.notification.clone())
                .collect();
            (inner.subscribers.clone(), snapshot)
        };
        for (_, callback) in subscribers {
            callback(&snapshot);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BusInner> {
        self.inner.lock().expect("notification bus lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::super::schedule::ManualScheduler;
    use super::*;

    fn bus() -> (NotificationBus, Arc<ManualScheduler>) {
        let scheduler = Arc::new(ManualScheduler::new());
        (NotificationBus::new(scheduler.clone()), scheduler)
    }

    #[test]
    fn batch_enqueues_get_distinct_ids_in_insertion_order() {
        let (bus, _) = bus();
        let ids: Vec<_> = (0..5)
            .map(|i| bus.enqueue(format!("message {i}"), NotificationKind::Info))
            .collect();

        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 5);

        let listed = bus.list();
        assert_eq!(listed.len(), 5);
        for (i, notification) in listed.iter().enumerate() {
            assert_eq!(notification.id, ids[i]);
            assert_eq!(notification.message, format!("message {i}"));
        }
    }

    #[test]
    fn auto_dismiss_fires_after_the_configured_duration() {
        let (bus, scheduler) = bus();
        bus.enqueue("short lived", NotificationKind::Success);

        scheduler.advance_to(3_999);
        assert_eq!(bus.list().len(), 1);
        scheduler.advance_to(4_001);
        assert!(bus.list().is_empty());
    }

    #[test]
    fn manual_dismiss_cancels_the_pending_timer() {
        let (bus, scheduler) = bus();
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&changes);
        bus.on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let id = bus.enqueue("bye", NotificationKind::Info);
        bus.dismiss(id);
        assert_eq!(scheduler.pending_count(), 0);

        // Nothing left to fire: advancing past the due time emits no event.
        scheduler.advance_to(10_000);
        assert_eq!(changes.load(Ordering::SeqCst), 2);
        assert!(bus.list().is_empty());
    }

    #[test]
    fn double_dismiss_is_a_noop() {
        let (bus, _) = bus();
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&changes);
        bus.on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let id = bus.enqueue("once", NotificationKind::Warning);
        bus.dismiss(id);
        bus.dismiss(id);
        assert_eq!(changes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn insertion_order_is_kept_across_mixed_durations() {
        let (bus, scheduler) = bus();
        bus.enqueue_with_duration("a", NotificationKind::Info, Some(10_000));
        bus.enqueue_with_duration("b", NotificationKind::Info, Some(1_000));
        bus.enqueue_with_duration("c", NotificationKind::Info, None);

        let messages: Vec<_> = bus.list().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["a", "b", "c"]);

        scheduler.advance_to(2_000);
        let messages: Vec<_> = bus.list().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["a", "c"]);
    }

    #[test]
    fn sticky_notifications_outlive_the_clock() {
        let (bus, scheduler) = bus();
        let id = bus.enqueue_with_duration("pinned", NotificationKind::Error, None);
        scheduler.advance_to(1_000_000);
        assert_eq!(bus.list().len(), 1);
        bus.dismiss(id);
        assert!(bus.list().is_empty());
    }

    #[test]
    fn on_change_receives_snapshots() {
        let (bus, _) = bus();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bus.on_change(move |list| {
            sink.lock().unwrap().push(list.len());
        });

        let id = bus.enqueue("one", NotificationKind::Info);
        bus.enqueue("two", NotificationKind::Info);
        bus.dismiss(id);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 1]);
    }

    #[test]
    fn unsubscribed_callback_stops_firing() {
        let (bus, _) = bus();
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&changes);
        let sub = bus.on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.enqueue("first", NotificationKind::Info);
        bus.unsubscribe(sub);
        bus.enqueue("second", NotificationKind::Info);
        assert_eq!(changes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dispose_clears_timers_and_silences_subscribers() {
        let (bus, scheduler) = bus();
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&changes);
        bus.on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        bus.enqueue("pending", NotificationKind::Info);

        bus.dispose();
        assert_eq!(scheduler.pending_count(), 0);

        scheduler.advance_to(100_000);
        bus.enqueue("after teardown", NotificationKind::Info);
        assert!(bus.list().is_empty());
        assert_eq!(changes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_messages_are_allowed() {
        let (bus, _) = bus();
        bus.enqueue("", NotificationKind::Info);
        assert_eq!(bus.list()[0].message, "");
    }

    #[test]
    fn created_at_comes_from_the_scheduler_clock() {
        let (bus, scheduler) = bus();
        scheduler.advance_to(1_234);
        bus.enqueue_with_duration("stamped", NotificationKind::Info, None);
        assert_eq!(bus.list()[0].created_at_ms, 1_234);
    }
}
