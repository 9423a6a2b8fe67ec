use leptos::prelude::*;

use crate::i18n::translate;
use crate::state::prefs::{Locale, Theme};
use crate::state::AppServices;

/// Dark/light toggle backed by the preference store; the store handles
/// persistence and the root-class swap.
#[component]
pub fn ThemeSwitch() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let theme = expect_context::<RwSignal<Theme>>();
    let locale = expect_context::<RwSignal<Locale>>();

    let label = move || {
        let key = match theme.get() {
            Theme::Dark => "a11y.lightMode",
            Theme::Light => "a11y.darkMode",
        };
        translate(locale.get(), key)
    };

    view! {
        <button
            class="p-2 rounded-full hover:bg-brightBlack/40 transition-colors"
            aria-label=label
            title=label
            on:click=move |_| services.prefs.toggle_theme()
        >
            {move || match theme.get() {
                Theme::Dark => "☾",
                Theme::Light => "☀",
            }}
        </button>
    }
}
