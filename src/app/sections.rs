use leptos::{html, prelude::*};

use crate::state::prefs::Locale;
use crate::state::AppServices;

use super::{tr, ActiveSection};

/// A content `<section>` whose viewport visibility feeds the section
/// tracker. The observer is scoped to this component and detaches with it.
#[component]
pub fn TrackedSection(id: &'static str, children: Children) -> impl IntoView {
    let node_ref = NodeRef::<html::Section>::new();

    #[cfg(feature = "hydrate")]
    {
        use leptos_use::{
            use_intersection_observer_with_options, UseIntersectionObserverOptions,
        };

        let services = expect_context::<AppServices>();
        let tracker = services.sections.clone();
        use_intersection_observer_with_options(
            node_ref,
            move |entries, _| {
                if let Some(entry) = entries.last() {
                    tracker.report_visibility(id, entry.intersection_ratio());
                }
            },
            UseIntersectionObserverOptions::default()
                .thresholds(vec![0.0, 0.15, 0.3, 0.45, 0.6, 0.75, 0.9, 1.0]),
        );
    }

    view! {
        <section id=id node_ref=node_ref class="min-h-[60vh] py-16 scroll-mt-20">
            {children()}
        </section>
    }
}

/// Fixed dot navigation for the tracked sections of the current page.
/// Clicking a dot smooth-scrolls under the header offset; the active dot
/// follows the tracker.
#[component]
pub fn SectionNav(ids: Vec<(&'static str, &'static str)>) -> impl IntoView {
    let services = expect_context::<AppServices>();
    let locale = expect_context::<RwSignal<Locale>>();
    let active = expect_context::<ActiveSection>().0;

    view! {
        <div class="fixed right-5 top-1/2 -translate-y-1/2 z-40 hidden lg:flex flex-col items-center space-y-4">
            {ids
                .into_iter()
                .map(|(id, label_key)| {
                    let tracker = services.sections.clone();
                    let analytics = services.analytics.clone();
                    view! {
                        <button
                            class=move || {
                                if active.get().as_deref() == Some(id) {
                                    "w-3 h-3 rounded-full bg-cyan scale-125 transition-all duration-300"
                                } else {
                                    "w-3 h-3 rounded-full bg-muted/50 hover:bg-muted transition-all duration-300"
                                }
                            }
                            aria-label=tr(locale, label_key)
                            on:click=move |_| {
                                analytics.event("section_nav", id);
                                tracker.scroll_to(id);
                            }
                        ></button>
                    }
                })
                .collect_view()}
        </div>
    }
}
