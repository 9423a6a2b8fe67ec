pub mod notify;
pub mod prefs;
pub mod schedule;
pub mod sections;
pub mod storage;

use std::sync::Arc;

use crate::analytics::Analytics;
use notify::NotificationBus;
use prefs::{DocumentEffects, PreferenceStore};
use schedule::TaskScheduler;
use sections::{SectionEffects, SectionTracker};
use storage::KeyValueStorage;

/// Identifies one registered callback on any of the state services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub(crate) u64);

/// The page-session singletons, constructed once at application start and
/// handed to the view tree via context. Recreated on a full reload; disposed
/// when the root component unmounts.
#[derive(Clone)]
pub struct AppServices {
    pub prefs: PreferenceStore,
    pub notifications: NotificationBus,
    pub sections: SectionTracker,
    pub analytics: Analytics,
}

impl AppServices {
    /// Wire the services for the hydrated client: localStorage persistence,
    /// `setTimeout` timers, real document mutation, OS color-scheme probe.
    #[cfg(feature = "hydrate")]
    pub fn new() -> Self {
        Self::assemble(
            Arc::new(storage::BrowserStorage),
            Arc::new(schedule::TimeoutScheduler::new()),
            Arc::new(prefs::BrowserDocumentEffects),
            Arc::new(sections::BrowserSectionEffects),
            os_prefers_light(),
        )
    }

    /// Headless wiring for server rendering: everything in memory, no
    /// document, no OS signal.
    #[cfg(not(feature = "hydrate"))]
    pub fn new() -> Self {
        Self::assemble(
            Arc::new(storage::MemoryStorage::new()),
            Arc::new(schedule::ManualScheduler::new()),
            Arc::new(prefs::NoopDocumentEffects),
            Arc::new(sections::NoopSectionEffects),
            None,
        )
    }

    pub fn assemble(
        storage: Arc<dyn KeyValueStorage>,
        scheduler: Arc<dyn TaskScheduler>,
        document_effects: Arc<dyn DocumentEffects>,
        section_effects: Arc<dyn SectionEffects>,
        os_prefers_light: Option<bool>,
    ) -> Self {
        let prefs = PreferenceStore::load(storage.clone(), document_effects, os_prefers_light);
        let notifications = NotificationBus::new(scheduler);
        let sections = SectionTracker::new(section_effects);
        let analytics = Analytics::new(storage);
        Self {
            prefs,
            notifications,
            sections,
            analytics,
        }
    }

    /// Teardown: cancel outstanding timers and drop every subscriber so no
    /// callback runs against a dismantled page.
    pub fn dispose(&self) {
        self.notifications.dispose();
        self.prefs.dispose();
        self.sections.dispose();
    }
}

impl Default for AppServices {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot read of the OS color-scheme signal, used only when no theme was
/// ever persisted.
#[cfg(feature = "hydrate")]
fn os_prefers_light() -> Option<bool> {
    let query = web_sys::window()?
        .match_media("(prefers-color-scheme: light)")
        .ok()
        .flatten()?;
    Some(query.matches())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headless() -> AppServices {
        AppServices::assemble(
            Arc::new(storage::MemoryStorage::new()),
            Arc::new(schedule::ManualScheduler::new()),
            Arc::new(prefs::NoopDocumentEffects),
            Arc::new(sections::NoopSectionEffects),
            None,
        )
    }

    #[test]
    fn services_start_from_documented_defaults() {
        let services = headless();
        assert_eq!(services.prefs.theme(), prefs::Theme::Dark);
        assert_eq!(services.prefs.locale(), prefs::Locale::En);
        assert!(services.notifications.list().is_empty());
        assert_eq!(services.sections.active_section(), None);
    }

    #[test]
    fn dispose_silences_every_service() {
        let services = headless();
        services.notifications.enqueue("pending", notify::NotificationKind::Info);
        services.dispose();
        assert!(services.notifications.list().is_empty());
    }
}
