use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::SubscriberId;

/// A section activates once strictly more than this share of it intersects
/// the viewport.
pub const SECTION_ACTIVATION_THRESHOLD: f64 = 0.35;

/// Fixed header height compensated for when scrolling to a section.
pub const HEADER_SCROLL_OFFSET_PX: f64 = 80.0;

/// Browser-facing effects of section activation. The fragment update must be
/// passive (no scroll jump), which is why it goes through `replaceState`
/// rather than assigning `location.hash`.
pub trait SectionEffects: Send + Sync {
    fn replace_fragment(&self, id: &str);
    fn scroll_to(&self, id: &str, header_offset_px: f64);
}

pub struct NoopSectionEffects;

impl SectionEffects for NoopSectionEffects {
    fn replace_fragment(&self, _id: &str) {}
    fn scroll_to(&self, _id: &str, _header_offset_px: f64) {}
}

type ActiveCallback = Arc<dyn Fn(Option<&str>) + Send + Sync>;

#[derive(Default)]
struct TrackerInner {
    /// Registration order doubles as the tie-break order.
    sections: Vec<String>,
    ratios: HashMap<String, f64>,
    active: Option<String>,
    next_subscriber: u64,
    subscribers: Vec<(SubscriberId, ActiveCallback)>,
}

/// Tracks which registered content section currently owns the viewport.
///
/// Visibility ratios are pushed in by per-section observers; the active id
/// is the section with the highest ratio above the threshold, ties going to
/// the earliest registered. Repeated measurements of the same state never
/// re-announce the active section.
#[derive(Clone)]
pub struct SectionTracker {
    inner: Arc<Mutex<TrackerInner>>,
    effects: Arc<dyn SectionEffects>,
}

impl SectionTracker {
    pub fn new(effects: Arc<dyn SectionEffects>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TrackerInner::default())),
            effects,
        }
    }

    /// Declare the observed sections in display order, replacing any prior
    /// registration. Visibility data for ids no longer registered is
    /// dropped; the active id is cleared if its section went away.
    pub fn register_sections<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (changed, active, subscribers) = {
            let mut inner = self.lock();
            inner.sections = ids.into_iter().map(Into::into).collect();
            let sections = inner.sections.clone();
            inner.ratios.retain(|id, _| sections.contains(id));
            let still_registered = inner
                .active
                .as_ref()
                .is_some_and(|active| sections.contains(active));
            if !still_registered && inner.active.is_some() {
                inner.active = None;
                (true, None, inner.subscribers.clone())
            } else {
                (false, inner.active.clone(), Vec::new())
            }
        };
        if changed {
            for (_, callback) in subscribers {
                callback(active.as_deref());
            }
        }
    }

    /// Feed one visibility measurement. Unknown ids are ignored; ratios are
    /// clamped to `0.0..=1.0`.
    pub fn report_visibility(&self, id: &str, ratio: f64) {
        let (activated, subscribers) = {
            let mut inner = self.lock();
            if !inner.sections.iter().any(|s| s == id) {
                log::debug!("visibility for unregistered section {id:?} ignored");
                return;
            }
            inner.ratios.insert(id.to_string(), ratio.clamp(0.0, 1.0));

            let winner = Self::resolve(&inner);
            match winner {
                // No qualifying section: keep the previous active id so the
                // highlight stays stable between tall sections.
                None => return,
                Some(winner) if inner.active.as_deref() == Some(winner.as_str()) => return,
                Some(winner) => {
                    inner.active = Some(winner.clone());
                    (winner, inner.subscribers.clone())
                }
            }
        };
        self.effects.replace_fragment(&activated);
        for (_, callback) in subscribers {
            callback(Some(activated.as_str()));
        }
    }

    fn resolve(inner: &TrackerInner) -> Option<String> {
        let mut best: Option<(&String, f64)> = None;
        for id in &inner.sections {
            let ratio = inner.ratios.get(id).copied().unwrap_or(0.0);
            if ratio <= SECTION_ACTIVATION_THRESHOLD {
                continue;
            }
            // Strictly greater, so earlier registration wins ties.
            if best.is_none_or(|(_, best_ratio)| ratio > best_ratio) {
                best = Some((id, ratio));
            }
        }
        best.map(|(id, _)| id.clone())
    }

    pub fn active_section(&self) -> Option<String> {
        self.lock().active.clone()
    }

    pub fn on_active_change(
        &self,
        callback: impl Fn(Option<&str>) + Send + Sync + 'static,
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

    /// Smooth-scroll the viewport so `id` sits below the fixed header.
    /// Unknown ids are a logged no-op.
    pub fn scroll_to(&self, id: &str) {
        let known = self.lock().sections.iter().any(|s| s == id);
        if known {
            self.effects.scroll_to(id, HEADER_SCROLL_OFFSET_PX);
        } else {
            log::debug!("scroll to unregistered section {id:?} ignored");
        }
    }

    pub fn dispose(&self) {
        self.lock().subscribers.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TrackerInner> {
        self.inner.lock().expect("section tracker lock poisoned")
    }
}

#[cfg(feature = "hydrate")]
pub use browser::BrowserSectionEffects;

#[cfg(feature = "hydrate")]
mod browser {
    use wasm_bindgen::JsValue;

    use super::SectionEffects;

    pub struct BrowserSectionEffects;

    impl SectionEffects for BrowserSectionEffects {
        fn replace_fragment(&self, id: &str) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let Ok(history) = window.history() else {
                return;
            };
            let url = format!("#{id}");
            if history
                .replace_state_with_url(&JsValue::NULL, "", Some(&url))
                .is_err()
            {
                log::debug!("could not update location fragment to {url}");
            }
        }

        fn scroll_to(&self, id: &str, header_offset_px: f64) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let Some(element) = window.document().and_then(|d| d.get_element_by_id(id)) else {
                log::debug!("section element #{id} not in document");
                return;
            };
            let rect = element.get_bounding_client_rect();
            let current = window.scroll_y().unwrap_or(0.0);
            let target = (rect.top() + current - header_offset_px).max(0.0);

            let options = web_sys::ScrollToOptions::new();
            options.set_top(target);
            options.set_behavior(web_sys::ScrollBehavior::Smooth);
            window.scroll_to_with_scroll_to_options(&options);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct RecordingEffects {
        log: Mutex<Vec<String>>,
    }

    impl RecordingEffects {
        fn entries(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    impl SectionEffects for RecordingEffects {
        fn replace_fragment(&self, id: &str) {
            self.log.lock().unwrap().push(format!("fragment:{id}"));
        }

        fn scroll_to(&self, id: &str, header_offset_px: f64) {
            self.log
                .lock()
                .unwrap()
                .push(format!("scroll:{id}:{header_offset_px}"));
        }
    }

    fn tracker() -> (SectionTracker, Arc<RecordingEffects>) {
        let effects = Arc::new(RecordingEffects::default());
        let tracker = SectionTracker::new(effects.clone());
        tracker.register_sections(["a", "b", "c"]);
        (tracker, effects)
    }

    #[test]
    fn clearly_visible_section_becomes_active() {
        let (tracker, effects) = tracker();
        tracker.report_visibility("a", 0.1);
        tracker.report_visibility("b", 0.4);
        tracker.report_visibility("c", 0.2);

        assert_eq!(tracker.active_section().as_deref(), Some("b"));
        assert_eq!(effects.entries(), vec!["fragment:b"]);
    }

    #[test]
    fn nothing_activates_below_the_threshold() {
        let (tracker, effects) = tracker();
        tracker.report_visibility("a", 0.3);
        tracker.report_visibility("b", 0.35);
        assert_eq!(tracker.active_section(), None);
        assert!(effects.entries().is_empty());
    }

    #[test]
    fn ties_break_to_the_lowest_order_section() {
        let (tracker, _) = tracker();
        tracker.report_visibility("c", 0.5);
        assert_eq!(tracker.active_section().as_deref(), Some("c"));

        // a ties c exactly; the earlier-registered section wins the tie.
        tracker.report_visibility("a", 0.5);
        assert_eq!(tracker.active_section().as_deref(), Some("a"));

        // A strictly higher ratio beats registration order.
        tracker.report_visibility("c", 0.6);
        assert_eq!(tracker.active_section().as_deref(), Some("c"));
    }

    #[test]
    fn duplicate_measurements_do_not_reannounce() {
        let (tracker, effects) = tracker();
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&changes);
        tracker.on_active_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tracker.report_visibility("b", 0.5);
        tracker.report_visibility("b", 0.5);
        tracker.report_visibility("b", 0.55);

        assert_eq!(changes.load(Ordering::SeqCst), 1);
        assert_eq!(effects.entries(), vec!["fragment:b"]);
    }

    #[test]
    fn previous_active_is_retained_when_everything_drops_below_threshold() {
        let (tracker, _) = tracker();
        tracker.report_visibility("b", 0.8);
        tracker.report_visibility("b", 0.1);
        assert_eq!(tracker.active_section().as_deref(), Some("b"));
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let (tracker, effects) = tracker();
        tracker.report_visibility("missing", 0.9);
        assert_eq!(tracker.active_section(), None);
        tracker.scroll_to("missing");
        assert!(effects.entries().is_empty());
    }

    #[test]
    fn scroll_to_known_section_uses_the_header_offset() {
        let (tracker, effects) = tracker();
        tracker.scroll_to("c");
        assert_eq!(effects.entries(), vec!["scroll:c:80"]);
    }

    #[test]
    fn reregistration_drops_stale_state() {
        let (tracker, _) = tracker();
        tracker.report_visibility("b", 0.9);
        assert_eq!(tracker.active_section().as_deref(), Some("b"));

        let events = Arc::new(Mutex::new(Vec::<Option<String>>::new()));
        let sink = Arc::clone(&events);
        tracker.on_active_change(move |active| {
            sink.lock().unwrap().push(active.map(str::to_string));
        });
        tracker.register_sections(["x", "y"]);
        assert_eq!(tracker.active_section(), None);

        // The old ratio for b must not leak into the new registration.
        tracker.report_visibility("x", 0.4);
        assert_eq!(tracker.active_section().as_deref(), Some("x"));
        assert_eq!(
            *events.lock().unwrap(),
            vec![None, Some("x".to_string())]
        );
    }

    #[test]
    fn ratios_are_clamped() {
        let (tracker, _) = tracker();
        tracker.report_visibility("a", 7.5);
        assert_eq!(tracker.active_section().as_deref(), Some("a"));
        tracker.report_visibility("b", -3.0);
        assert_eq!(tracker.active_section().as_deref(), Some("a"));
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let (tracker, _) = tracker();
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&changes);
        let sub = tracker.on_active_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tracker.report_visibility("a", 0.5);
        tracker.unsubscribe(sub);
        tracker.report_visibility("b", 0.9);
        assert_eq!(changes.load(Ordering::SeqCst), 1);
    }
}
