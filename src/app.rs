mod about;
mod accessibility;
mod contact;
mod home;
mod language;
mod layout;
mod projects;
mod sections;
mod theme;
mod toasts;

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::{components::*, path};

use crate::i18n::translate;
use crate::state::prefs::Locale;
use crate::state::AppServices;

use about::AboutPage;
use contact::ContactPage;
use home::HomePage;
use layout::{Footer, Header};
use projects::{ProjectPage, ProjectsHome, ProjectsWrapper};
use toasts::ToastStack;

/// Currently active home-page section, bridged out of the section tracker.
#[derive(Clone, Copy)]
pub(crate) struct ActiveSection(pub RwSignal<Option<String>>);

/// Reactive translation lookup for use directly inside `view!`.
pub(crate) fn tr(
    locale: RwSignal<Locale>,
    key: &'static str,
) -> impl Fn() -> String + Clone + Send + Sync + 'static {
    move || translate(locale.get(), key)
}

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <meta name="color-scheme" content="dark light" />
                <link rel="shortcut icon" type="image/ico" href="/favicon.ico" />
                <link rel="stylesheet" id="leptos" href="/pkg/portfolio-site.css" />
                <MetaTags />
            </head>
            <body class="font-sans">
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    // The page-session services live exactly as long as this component.
    let services = AppServices::new();
    provide_context(services.clone());

    // Bridge the imperative service layer into the reactive graph once;
    // every component below reads these signals instead of polling.
    let locale = RwSignal::new(services.prefs.locale());
    let theme = RwSignal::new(services.prefs.theme());
    let accessibility = RwSignal::new(services.prefs.accessibility());
    let toasts = RwSignal::new(services.notifications.list());
    let active_section = RwSignal::new(services.sections.active_section());

    services.prefs.subscribe_locale(move |value| locale.set(value));
    services.prefs.subscribe_theme(move |value| theme.set(value));
    services
        .prefs
        .subscribe_accessibility(move |value| accessibility.set(value));
    services
        .notifications
        .on_change(move |list| toasts.set(list.to_vec()));
    services
        .sections
        .on_active_change(move |id| active_section.set(id.map(str::to_string)));

    provide_context(locale);
    provide_context(theme);
    provide_context(accessibility);
    provide_context(toasts);
    provide_context(ActiveSection(active_section));

    let teardown = services.clone();
    on_cleanup(move || teardown.dispose());

    view! {
        // sets the document title
        <Title formatter=|title| format!("Nadia Belkacem - {title}") />

        <Router>
            <Header />
            <main id="main" class="flex flex-col flex-grow mx-auto w-full max-w-6xl px-4">
                <ErrorBoundary fallback=|_| view! { <RenderFallback /> }>
                    <Routes fallback=|| view! { <NotFound /> }>
                        <Route path=path!("/") view=HomePage />
                        <Route path=path!("/about") view=AboutPage />
                        <ParentRoute path=path!("/projects") view=ProjectsWrapper>
                            <Route path=path!("") view=ProjectsHome />
                            <Route path=path!(":project") view=ProjectPage />
                        </ParentRoute>
                        <Route path=path!("/contact") view=ContactPage />
                    </Routes>
                </ErrorBoundary>
            </main>
            <Footer />
            <ToastStack />
        </Router>
    }
}

/// Recoverable full-page fallback for unexpected rendering errors.
#[component]
fn RenderFallback() -> impl IntoView {
    let locale = expect_context::<RwSignal<Locale>>();
    view! {
        <div class="flex flex-col items-center justify-center min-h-[50vh] p-4 text-center">
            <h2 class="text-2xl font-bold mb-4">{tr(locale, "error.title")}</h2>
            <p class="text-muted mb-2">{tr(locale, "error.body")}</p>
            <button
                class="px-4 py-2 mt-4 rounded-md bg-brightBlack/40 hover:bg-brightBlack/60 transition-colors"
                on:click=move |_| reload_page()
            >
                {tr(locale, "error.retry")}
            </button>
        </div>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    // A server render of an unknown path must answer with a real 404.
    #[cfg(feature = "ssr")]
    {
        use http::StatusCode;
        if let Some(response) = use_context::<leptos_axum::ResponseOptions>() {
            response.set_status(StatusCode::NOT_FOUND);
        }
    }
    let locale = expect_context::<RwSignal<Locale>>();
    view! {
        <Title text="Not Found" />
        <div class="flex flex-col items-center justify-center min-h-[50vh] text-center">
            <h1 class="text-3xl font-bold mb-4">{tr(locale, "notfound.title")}</h1>
            <p class="text-muted mb-6">{tr(locale, "notfound.body")}</p>
            <A href="/" attr:class="text-cyan hover:text-brightCyan underline">
                {tr(locale, "notfound.home")}
            </A>
        </div>
    }
}

fn reload_page() {
    #[cfg(feature = "hydrate")]
    if let Some(window) = web_sys::window() {
        let _ = window.location().reload();
    }
}
