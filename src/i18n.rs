use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use rust_embed::Embed;

use crate::state::prefs::Locale;

/// Translation bundles, one JSON object per locale, embedded at build time.
#[derive(Embed)]
#[folder = "i18n"]
struct Bundles;

static BUNDLE_CACHE: LazyLock<DashMap<Locale, Arc<HashMap<String, String>>>> =
    LazyLock::new(DashMap::new);

fn bundle(locale: Locale) -> Arc<HashMap<String, String>> {
    if let Some(cached) = BUNDLE_CACHE.get(&locale) {
        return cached.clone();
    }
    let parsed = load_bundle(locale);
    BUNDLE_CACHE.insert(locale, parsed.clone());
    parsed
}

fn load_bundle(locale: Locale) -> Arc<HashMap<String, String>> {
    let name = format!("{}.json", locale.as_str());
    let Some(file) = Bundles::get(&name) else {
        log::error!("translation bundle {name} is missing from the build");
        return Arc::new(HashMap::new());
    };
    match serde_json::from_slice::<HashMap<String, String>>(&file.data) {
        Ok(map) => Arc::new(map),
        Err(err) => {
            log::error!("translation bundle {name} is malformed: {err}");
            Arc::new(HashMap::new())
        }
    }
}

/// Look up `key` for `locale`, falling back to English, then to the key
/// itself so a missing entry stays visible instead of blanking the UI.
pub fn translate(locale: Locale, key: &str) -> String {
    if let Some(text) = bundle(locale).get(key) {
        return text.clone();
    }
    if locale != Locale::En {
        if let Some(text) = bundle(Locale::En).get(key) {
            return text.clone();
        }
    }
    key.to_string()
}

/// `translate` with `{name}`-style placeholder substitution.
pub fn translate_with(locale: Locale, key: &str, placeholders: &[(&str, &str)]) -> String {
    let mut text = translate(locale, key);
    for (name, value) in placeholders {
        text = text.replace(&format!("{{{name}}}"), value);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_locale_bundle_parses() {
        for locale in Locale::all() {
            assert!(
                !bundle(locale).is_empty(),
                "bundle for {} failed to load",
                locale.as_str()
            );
        }
    }

    #[test]
    fn known_keys_resolve_per_locale() {
        assert_eq!(translate(Locale::En, "nav.projects"), "Projects");
        assert_eq!(translate(Locale::Fr, "nav.projects"), "Projets");
        assert_eq!(translate(Locale::Es, "nav.projects"), "Proyectos");
        assert_eq!(translate(Locale::Ar, "nav.projects"), "المشاريع");
    }

    #[test]
    fn unknown_keys_come_back_verbatim() {
        // No bundle carries this key; the key itself stays visible.
        assert_eq!(translate(Locale::Fr, "no.such.key"), "no.such.key");
    }

    #[test]
    fn nav_keys_exist_in_every_bundle() {
        for locale in Locale::all() {
            for key in ["nav.home", "nav.about", "nav.projects", "nav.contact"] {
                assert!(
                    bundle(locale).contains_key(key),
                    "{key} missing from {}",
                    locale.as_str()
                );
            }
        }
    }

    #[test]
    fn placeholders_are_substituted() {
        let text = translate_with(Locale::En, "footer.copyright", &[("year", "2026")]);
        assert!(text.contains("2026"));
        assert!(!text.contains("{year}"));
    }
}
