use leptos::prelude::*;
use leptos_router::{components::*, hooks::use_location};

use crate::state::prefs::Locale;
use crate::state::AppServices;

use super::accessibility::AccessibilityControls;
use super::language::LanguageSwitcher;
use super::theme::ThemeSwitch;
use super::tr;

#[component]
pub fn Header() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let locale = expect_context::<RwSignal<Locale>>();
    let location = use_location();

    // Page-view tracking hangs off route changes here, scoped to the one
    // component that always lives inside the router.
    let analytics = services.analytics.clone();
    Effect::new(move |_| {
        analytics.page_view(&location.pathname.get());
    });

    let nav_links = [
        ("/", "nav.home"),
        ("/about", "nav.about"),
        ("/projects", "nav.projects"),
        ("/contact", "nav.contact"),
    ];

    let pathname = use_location().pathname;
    view! {
        <a href="#main" class="skip-link sr-only focus:not-sr-only">
            {tr(locale, "a11y.skipToContent")}
        </a>
        <header class="sticky top-0 z-40 shadow-lg backdrop-blur-md bg-background/80">
            <div class="mx-auto max-w-6xl px-4 sm:px-6 lg:px-8 py-4 flex flex-wrap items-center justify-between gap-4">
                <A href="/" attr:class="text-xl font-bold tracking-tight">
                    <span class="text-cyan">"nadia"</span>
                    <span class="text-muted">"@"</span>
                    <span class="text-purple">"belkacem.dev"</span>
                </A>
                <nav class="flex items-center gap-4" aria-label="Primary">
                    {nav_links
                        .into_iter()
                        .map(|(href, key)| {
                            let active = move || {
                                let current = pathname.get();
                                if href == "/" {
                                    current == "/"
                                } else {
                                    current.starts_with(href)
                                }
                            };
                            view! {
                                <A
                                    href=href
                                    attr:class=move || {
                                        if active() {
                                            "text-cyan font-medium"
                                        } else {
                                            "text-muted hover:text-foreground transition-colors"
                                        }
                                    }
                                >
                                    {tr(locale, key)}
                                </A>
                            }
                        })
                        .collect_view()}
                </nav>
                <div class="flex items-center gap-2">
                    <ShareButton />
                    <ThemeSwitch />
                    <LanguageSwitcher />
                    <AccessibilityControls />
                </div>
            </div>
        </header>
    }
}

#[component]
pub fn Footer() -> impl IntoView {
    let locale = expect_context::<RwSignal<Locale>>();
    // BUILD_TIME is RFC 3339, so the year is the first four characters.
    let year = &env!("BUILD_TIME")[..4];
    view! {
        <footer class="mt-16 py-8 border-t border-muted/30 text-center text-sm text-muted">
            <p>
                {move || {
                    crate::i18n::translate_with(
                        locale.get(),
                        "footer.copyright",
                        &[("year", year)],
                    )
                }}
            </p>
            <p class="mt-1">{tr(locale, "footer.builtWith")}</p>
        </footer>
    }
}

/// Copies the current page URL and reports the outcome through the
/// notification bus.
#[component]
fn ShareButton() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let locale = expect_context::<RwSignal<Locale>>();
    view! {
        <button
            class="p-2 rounded-full hover:bg-brightBlack/40 transition-colors"
            aria-label=tr(locale, "share.copyLink")
            title=tr(locale, "share.copyLink")
            on:click=move |_| copy_current_url(services.clone(), locale.get_untracked())
        >
            "🔗"
        </button>
    }
}

#[cfg(feature = "hydrate")]
fn copy_current_url(services: AppServices, locale: Locale) {
    use crate::i18n::translate;
    use wasm_bindgen_futures::JsFuture;

    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(href) = window.location().href() else {
        return;
    };
    let clipboard = window.navigator().clipboard();
    leptos::task::spawn_local(async move {
        match JsFuture::from(clipboard.write_text(&href)).await {
            Ok(_) => {
                services.analytics.event("share_copy", &href);
                services
                    .notifications
                    .success(translate(locale, "share.copied"));
            }
            Err(err) => {
                log::warn!("clipboard write failed: {err:?}");
                services
                    .notifications
                    .error(translate(locale, "share.error"));
            }
        }
    });
}

#[cfg(not(feature = "hydrate"))]
fn copy_current_url(_services: AppServices, _locale: Locale) {}
