use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::state::storage::KeyValueStorage;

pub const SESSION_KEY: &str = "portfolio_session_id";

/// Page-view and event tracking stub. A session id is generated once per
/// browser and reused from durable storage thereafter; everything else is
/// logged through the `log` facade and goes nowhere.
#[derive(Clone)]
pub struct Analytics {
    session_id: String,
    page_views: Arc<Mutex<u32>>,
}

impl Analytics {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let session_id = match storage.get(SESSION_KEY) {
            Some(existing) if !existing.is_empty() => existing,
            _ => {
                let fresh = Uuid::new_v4().to_string();
                if let Err(err) = storage.set(SESSION_KEY, &fresh) {
                    log::warn!("session id not persisted, tracking this session only: {err}");
                }
                fresh
            }
        };
        Self {
            session_id,
            page_views: Arc::new(Mutex::new(0)),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn page_views(&self) -> u32 {
        *self.page_views.lock().expect("page view counter poisoned")
    }

    pub fn page_view(&self, path: &str) {
        let count = {
            let mut views = self.page_views.lock().expect("page view counter poisoned");
            *views += 1;
            *views
        };
        log::debug!(
            "analytics page_view session={} path={path} count={count}",
            self.session_id
        );
    }

    pub fn event(&self, name: &str, detail: &str) {
        log::debug!(
            "analytics event session={} name={name} detail={detail}",
            self.session_id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::storage::MemoryStorage;

    #[test]
    fn session_id_is_generated_once_and_reused() {
        let storage: Arc<MemoryStorage> = Arc::new(MemoryStorage::new());
        let first = Analytics::new(storage.clone());
        let stored = storage.get(SESSION_KEY).unwrap();
        assert_eq!(first.session_id(), stored);

        let second = Analytics::new(storage);
        assert_eq!(second.session_id(), stored);
    }

    #[test]
    fn session_id_is_a_valid_uuid() {
        let analytics = Analytics::new(Arc::new(MemoryStorage::new()));
        assert!(Uuid::parse_str(analytics.session_id()).is_ok());
    }

    #[test]
    fn distinct_browsers_get_distinct_sessions() {
        let a = Analytics::new(Arc::new(MemoryStorage::new()));
        let b = Analytics::new(Arc::new(MemoryStorage::new()));
        assert_ne!(a.session_id(), b.session_id());
    }

    #[test]
    fn page_views_count_up() {
        let analytics = Analytics::new(Arc::new(MemoryStorage::new()));
        analytics.page_view("/");
        analytics.page_view("/projects");
        assert_eq!(analytics.page_views(), 2);
    }
}
