use std::str::FromStr;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::storage::KeyValueStorage;
use super::SubscriberId;

pub const THEME_KEY: &str = "theme";
pub const LOCALE_KEY: &str = "portfolioLanguage";
pub const ACCESSIBILITY_KEY: &str = "accessibility";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrefError {
    #[error("unsupported {domain} value: {value:?}")]
    OutOfDomain {
        domain: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl FromStr for Theme {
    type Err = PrefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(PrefError::OutOfDomain {
                domain: "theme",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Fr,
    Ar,
    Es,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

impl Locale {
    pub fn all() -> [Locale; 4] {
        [Locale::En, Locale::Fr, Locale::Ar, Locale::Es]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
            Locale::Ar => "ar",
            Locale::Es => "es",
        }
    }

    /// Name of the language in that language, for the switcher control.
    pub fn native_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Fr => "Français",
            Locale::Ar => "العربية",
            Locale::Es => "Español",
        }
    }

    /// Text direction is derived from the locale, never stored.
    pub fn direction(&self) -> TextDirection {
        match self {
            Locale::Ar => TextDirection::Rtl,
            _ => TextDirection::Ltr,
        }
    }
}

impl FromStr for Locale {
    type Err = PrefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Locale::En),
            "fr" => Ok(Locale::Fr),
            "ar" => Ok(Locale::Ar),
            "es" => Ok(Locale::Es),
            other => Err(PrefError::OutOfDomain {
                domain: "locale",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Normal,
    Large,
    XLarge,
}

impl FontSize {
    pub fn smaller(&self) -> FontSize {
        match self {
            FontSize::Small | FontSize::Normal => FontSize::Small,
            FontSize::Large => FontSize::Normal,
            FontSize::XLarge => FontSize::Large,
        }
    }

    pub fn larger(&self) -> FontSize {
        match self {
            FontSize::Small => FontSize::Normal,
            FontSize::Normal => FontSize::Large,
            FontSize::Large | FontSize::XLarge => FontSize::XLarge,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FontSize::Small => "Small",
            FontSize::Normal => "Normal",
            FontSize::Large => "Large",
            FontSize::XLarge => "Extra Large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contrast {
    #[default]
    Normal,
    High,
    Ultra,
}

impl Contrast {
    pub fn lower(&self) -> Contrast {
        match self {
            Contrast::Normal | Contrast::High => Contrast::Normal,
            Contrast::Ultra => Contrast::High,
        }
    }

    pub fn higher(&self) -> Contrast {
        match self {
            Contrast::Normal => Contrast::High,
            Contrast::High | Contrast::Ultra => Contrast::Ultra,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Contrast::Normal => "Normal",
            Contrast::High => "High",
            Contrast::Ultra => "Ultra",
        }
    }
}

/// Accessibility settings persisted as one JSON record under
/// `accessibility`. Field names match the historical storage layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessibilityPrefs {
    pub font_size: FontSize,
    pub contrast: Contrast,
    pub reduced_motion: bool,
    pub focus_mode: bool,
}

/// Side effects a successful preference change applies to the document.
/// Injected so the store stays headless-testable; the browser impl mutates
/// `<html>`/`<body>`, the noop impl serves SSR.
pub trait DocumentEffects: Send + Sync {
    fn apply_theme(&self, theme: Theme);
    fn apply_locale(&self, locale: Locale);
    fn apply_accessibility(&self, prefs: &AccessibilityPrefs);
}

pub struct NoopDocumentEffects;

impl DocumentEffects for NoopDocumentEffects {
    fn apply_theme(&self, _theme: Theme) {}
    fn apply_locale(&self, _locale: Locale) {}
    fn apply_accessibility(&self, _prefs: &AccessibilityPrefs) {}
}

type ThemeCallback = Arc<dyn Fn(Theme) + Send + Sync>;
type LocaleCallback = Arc<dyn Fn(Locale) + Send + Sync>;
type AccessibilityCallback = Arc<dyn Fn(AccessibilityPrefs) + Send + Sync>;

#[derive(Default)]
struct PrefState {
    theme: Theme,
    locale: Locale,
    accessibility: AccessibilityPrefs,
    next_subscriber: u64,
    theme_subs: Vec<(SubscriberId, ThemeCallback)>,
    locale_subs: Vec<(SubscriberId, LocaleCallback)>,
    accessibility_subs: Vec<(SubscriberId, AccessibilityCallback)>,
}

/// Process-wide user preferences: in-memory source of truth, persisted on
/// every successful mutation, applied to the document, observable per key.
#[derive(Clone)]
pub struct PreferenceStore {
    inner: Arc<Mutex<PrefState>>,
    storage: Arc<dyn KeyValueStorage>,
    effects: Arc<dyn DocumentEffects>,
}

impl PreferenceStore {
    /// Read persisted preferences (or defaults) and apply them to the
    /// document once. `os_prefers_light` is the OS color-scheme signal,
    /// consulted only when no theme was ever stored; the resolved theme is
    /// persisted immediately so later OS changes don't override it.
    pub fn load(
        storage: Arc<dyn KeyValueStorage>,
        effects: Arc<dyn DocumentEffects>,
        os_prefers_light: Option<bool>,
    ) -> Self {
        let theme = match storage.get(THEME_KEY).map(|raw| raw.parse::<Theme>()) {
            Some(Ok(theme)) => theme,
            Some(Err(err)) => {
                log::warn!("ignoring persisted theme: {err}");
                Self::resolve_first_theme(storage.as_ref(), os_prefers_light)
            }
            None => Self::resolve_first_theme(storage.as_ref(), os_prefers_light),
        };

        let locale = match storage.get(LOCALE_KEY).map(|raw| raw.parse::<Locale>()) {
            Some(Ok(locale)) => locale,
            Some(Err(err)) => {
                log::warn!("ignoring persisted locale: {err}");
                Locale::default()
            }
            None => Locale::default(),
        };

        let accessibility = match storage.get(ACCESSIBILITY_KEY) {
            Some(raw) => serde_json::from_str::<AccessibilityPrefs>(&raw).unwrap_or_else(|err| {
                log::warn!("ignoring malformed accessibility settings: {err}");
                AccessibilityPrefs::default()
            }),
            None => AccessibilityPrefs::default(),
        };

        effects.apply_theme(theme);
        effects.apply_locale(locale);
        effects.apply_accessibility(&accessibility);

        Self {
            inner: Arc::new(Mutex::new(PrefState {
                theme,
                locale,
                accessibility,
                ..PrefState::default()
            })),
            storage,
            effects,
        }
    }

    fn resolve_first_theme(storage: &dyn KeyValueStorage, os_prefers_light: Option<bool>) -> Theme {
        let theme = if os_prefers_light == Some(true) {
            Theme::Light
        } else {
            Theme::Dark
        };
        if let Err(err) = storage.set(THEME_KEY, theme.as_str()) {
            log::warn!("could not persist resolved theme: {err}");
        }
        theme
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(err) = self.storage.set(key, value) {
            log::warn!("preference {key} not persisted, keeping in-memory value: {err}");
        }
    }

    pub fn theme(&self) -> Theme {
        self.lock().theme
    }

    pub fn locale(&self) -> Locale {
        self.lock().locale
    }

    pub fn accessibility(&self) -> AccessibilityPrefs {
        self.lock().accessibility
    }

    pub fn set_theme(&self, theme: Theme) {
        let subs = {
            let mut state = self.lock();
            state.theme = theme;
            state.theme_subs.clone()
        };
        self.persist(THEME_KEY, theme.as_str());
        self.effects.apply_theme(theme);
        for (_, callback) in subs {
            callback(theme);
        }
    }

    pub fn toggle_theme(&self) {
        let next = self.theme().toggled();
        self.set_theme(next);
    }

    pub fn reset_theme(&self) {
        self.set_theme(Theme::default());
    }

    pub fn set_locale(&self, locale: Locale) {
        let subs = {
            let mut state = self.lock();
            state.locale = locale;
            state.locale_subs.clone()
        };
        self.persist(LOCALE_KEY, locale.as_str());
        self.effects.apply_locale(locale);
        for (_, callback) in subs {
            callback(locale);
        }
    }

    /// String-input surface for the locale (the `<select>` control hands us
    /// raw attribute values). Out-of-domain input is rejected with a logged
    /// warning and the prior value stays in place.
    pub fn set_locale_tag(&self, tag: &str) {
        match tag.parse::<Locale>() {
            Ok(locale) => self.set_locale(locale),
            Err(err) => log::warn!("locale change rejected: {err}"),
        }
    }

    pub fn reset_locale(&self) {
        self.set_locale(Locale::default());
    }

    pub fn set_accessibility(&self, prefs: AccessibilityPrefs) {
        let subs = {
            let mut state = self.lock();
            state.accessibility = prefs;
            state.accessibility_subs.clone()
        };
        match serde_json::to_string(&prefs) {
            Ok(json) => self.persist(ACCESSIBILITY_KEY, &json),
            Err(err) => log::warn!("could not encode accessibility settings: {err}"),
        }
        self.effects.apply_accessibility(&prefs);
        for (_, callback) in subs {
            callback(prefs);
        }
    }

    pub fn update_accessibility(&self, update: impl FnOnce(&mut AccessibilityPrefs)) {
        let mut prefs = self.accessibility();
        update(&mut prefs);
        self.set_accessibility(prefs);
    }

    pub fn reset_accessibility(&self) {
        self.set_accessibility(AccessibilityPrefs::default());
    }

    pub fn subscribe_theme(&self, callback: impl Fn(Theme) + Send + Sync + 'static) -> SubscriberId {
        let mut state = self.lock();
        let id = Self::next_id(&mut state);
        state.theme_subs.push((id, Arc::new(callback)));
        id
    }

    pub fn subscribe_locale(
        &self,
        callback: impl Fn(Locale) + Send + Sync + 'static,
    ) -> SubscriberId {
        let mut state = self.lock();
        let id = Self::next_id(&mut state);
        state.locale_subs.push((id, Arc::new(callback)));
        id
    }

    pub fn subscribe_accessibility(
        &self,
        callback: impl Fn(AccessibilityPrefs) + Send + Sync + 'static,
    ) -> SubscriberId {
        let mut state = self.lock();
        let id = Self::next_id(&mut state);
        state.accessibility_subs.push((id, Arc::new(callback)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        let mut state = self.lock();
        state.theme_subs.retain(|(sub, _)| *sub != id);
        state.locale_subs.retain(|(sub, _)| *sub != id);
        state.accessibility_subs.retain(|(sub, _)| *sub != id);
    }

    /// Drop every subscriber; part of application teardown.
    pub fn dispose(&self) {
        let mut state = self.lock();
        state.theme_subs.clear();
        state.locale_subs.clear();
        state.accessibility_subs.clear();
    }

    fn next_id(state: &mut PrefState) -> SubscriberId {
        let id = SubscriberId(state.next_subscriber);
        state.next_subscriber += 1;
        id
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PrefState> {
        self.inner.lock().expect("preference store lock poisoned")
    }
}

#[cfg(feature = "hydrate")]
pub use browser::BrowserDocumentEffects;

#[cfg(feature = "hydrate")]
mod browser {
    use super::{AccessibilityPrefs, Contrast, DocumentEffects, FontSize, Locale, Theme};

    /// Applies preferences to `<html>`/`<body>` classes and attributes.
    pub struct BrowserDocumentEffects;

    impl BrowserDocumentEffects {
        fn document() -> Option<web_sys::Document> {
            web_sys::window().and_then(|w| w.document())
        }

        fn swap_classes(element: &web_sys::Element, remove: &[&str], add: &[&str]) {
            let class_list = element.class_list();
            for class in remove {
                let _ = class_list.remove_1(class);
            }
            for class in add {
                let _ = class_list.add_1(class);
            }
        }
    }

    impl DocumentEffects for BrowserDocumentEffects {
        fn apply_theme(&self, theme: Theme) {
            let Some(root) = Self::document().and_then(|d| d.document_element()) else {
                return;
            };
            match theme {
                Theme::Dark => Self::swap_classes(&root, &["light"], &["dark"]),
                Theme::Light => Self::swap_classes(&root, &["dark"], &["light"]),
            }
        }

        fn apply_locale(&self, locale: Locale) {
            let Some(document) = Self::document() else {
                return;
            };
            if let Some(root) = document.document_element() {
                let _ = root.set_attribute("lang", locale.as_str());
                let _ = root.set_attribute("dir", locale.direction().as_str());
            }
            if let Some(body) = document.body() {
                let class_list = body.class_list();
                match locale.direction() {
                    super::TextDirection::Rtl => {
                        let _ = class_list.add_1("rtl");
                    }
                    super::TextDirection::Ltr => {
                        let _ = class_list.remove_1("rtl");
                    }
                }
            }
        }

        fn apply_accessibility(&self, prefs: &AccessibilityPrefs) {
            let Some(root) = Self::document().and_then(|d| d.document_element()) else {
                return;
            };
            let font_class: &[&str] = match prefs.font_size {
                FontSize::Small => &["text-sm"],
                FontSize::Normal => &[],
                FontSize::Large => &["text-lg"],
                FontSize::XLarge => &["text-xl"],
            };
            Self::swap_classes(&root, &["text-sm", "text-lg", "text-xl"], font_class);

            let contrast_class: &[&str] = match prefs.contrast {
                Contrast::Normal => &[],
                Contrast::High => &["high-contrast"],
                Contrast::Ultra => &["ultra-contrast"],
            };
            Self::swap_classes(&root, &["high-contrast", "ultra-contrast"], contrast_class);

            if prefs.reduced_motion {
                Self::swap_classes(&root, &[], &["reduce-motion"]);
            } else {
                Self::swap_classes(&root, &["reduce-motion"], &[]);
            }
            if prefs.focus_mode {
                Self::swap_classes(&root, &[], &["focus-mode"]);
            } else {
                Self::swap_classes(&root, &["focus-mode"], &[]);
            }
        }
    }
}
