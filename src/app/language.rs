use leptos::prelude::*;

use crate::state::prefs::Locale;
use crate::state::AppServices;

/// Locale selector. The `<select>` hands back raw strings, so this is the
/// one surface that goes through the store's validating string setter.
#[component]
pub fn LanguageSwitcher() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let locale = expect_context::<RwSignal<Locale>>();

    view! {
        <select
            class="bg-transparent border border-muted/40 rounded-md px-2 py-1 text-sm cursor-pointer"
            aria-label="Language"
            on:change=move |ev| services.prefs.set_locale_tag(&event_target_value(&ev))
        >
            {Locale::all()
                .into_iter()
                .map(|option| {
                    view! {
                        <option
                            value=option.as_str()
                            selected=move || locale.get() == option
                        >
                            {option.native_name()}
                        </option>
                    }
                })
                .collect_view()}
        </select>
    }
}
