use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::components::A;

use crate::projects::GLOBAL_META_CACHE;
use crate::state::prefs::Locale;
use crate::state::AppServices;

use super::projects::get_meta_server;
use super::sections::{SectionNav, TrackedSection};
use super::tr;

#[component]
pub fn HomePage() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let locale = expect_context::<RwSignal<Locale>>();

    services
        .sections
        .register_sections(["hero", "about", "projects", "contact"]);

    let scroll_services = services.clone();

    view! {
        <Title text="Home" />
        <SectionNav ids=vec![
            ("hero", "nav.home"),
            ("about", "nav.about"),
            ("projects", "nav.projects"),
            ("contact", "nav.contact"),
        ] />

        <TrackedSection id="hero">
            <div class="flex flex-col justify-center min-h-[60vh] max-w-3xl">
                <p class="text-cyan mb-4">{tr(locale, "hero.greeting")}</p>
                <h1 class="text-4xl lg:text-6xl font-bold mb-2">"Nadia Belkacem"</h1>
                <h2 class="text-2xl lg:text-4xl font-bold text-muted mb-6">
                    {tr(locale, "hero.role")}
                </h2>
                <p class="text-lg text-muted max-w-xl mb-8 leading-relaxed">
                    {tr(locale, "hero.description")}
                </p>
                <div>
                    <button
                        class="px-6 py-3 rounded-md bg-cyan/20 hover:bg-cyan/30 text-cyan border border-cyan/30 font-medium transition-all duration-200"
                        on:click=move |_| scroll_services.sections.scroll_to("projects")
                    >
                        {tr(locale, "hero.cta")}
                    </button>
                </div>
            </div>
        </TrackedSection>

        <TrackedSection id="about">
            <h2 class="text-3xl font-bold mb-2">{tr(locale, "about.title")}</h2>
            <p class="text-muted mb-8">{tr(locale, "about.subtitle")}</p>
            <div class="grid lg:grid-cols-2 gap-8">
                <div>
                    <p class="text-base mb-4 leading-relaxed">{tr(locale, "about.p1")}</p>
                    <p class="text-base mb-4 leading-relaxed">{tr(locale, "about.p2")}</p>
                </div>
                <div>
                    <p class="text-base mb-4 leading-relaxed">{tr(locale, "about.p3")}</p>
                    <A href="/about" attr:class="text-cyan hover:text-brightCyan underline">
                        {tr(locale, "nav.about")} " →"
                    </A>
                </div>
            </div>
        </TrackedSection>

        <TrackedSection id="projects">
            <h2 class="text-3xl font-bold mb-2">{tr(locale, "projects.featured")}</h2>
            <p class="text-muted mb-8">{tr(locale, "projects.subtitle")}</p>
            <FeaturedProjects />
            <div class="mt-8">
                <A href="/projects" attr:class="text-cyan hover:text-brightCyan underline">
                    {tr(locale, "projects.viewAll")} " →"
                </A>
            </div>
        </TrackedSection>

        <TrackedSection id="contact">
            <div class="max-w-2xl mx-auto text-center">
                <h2 class="text-3xl font-bold mb-2">{tr(locale, "contact.title")}</h2>
                <p class="text-muted mb-8">{tr(locale, "contact.subtitle")}</p>
                <div class="bg-brightBlack/20 p-6 rounded-lg border border-muted/30">
                    <div class="flex flex-col sm:flex-row items-center justify-center gap-4">
                        <button
                            class="bg-cyan/20 hover:bg-cyan/30 text-cyan px-6 py-3 rounded-md font-medium transition-all duration-200 border border-cyan/30"
                            onclick="navigator.clipboard.writeText('hello@nadiabelkacem.dev').then(() => alert('📋 hello@nadiabelkacem.dev'))"
                        >
                            "📧 hello@nadiabelkacem.dev"
                        </button>
                        <A
                            href="/contact"
                            attr:class="px-6 py-3 rounded-md border border-muted/40 hover:border-cyan/40 transition-colors"
                        >
                            {tr(locale, "contact.formSubmit")}
                        </A>
                    </div>
                </div>
            </div>
        </TrackedSection>
    }
}

#[component]
fn FeaturedProjects() -> impl IntoView {
    let projects = Resource::new(
        || (),
        |_| async move {
            let cache = &*GLOBAL_META_CACHE;
            if let Some(cached) = cache.get("") {
                return (*cached).clone();
            }
            let metas = get_meta_server(String::new()).await.unwrap_or_default();
            // only cache on the browser
            #[cfg(feature = "hydrate")]
            cache.insert(String::new(), metas.clone());
            metas
        },
    );

    view! {
        <Transition fallback=move || {
            view! {
                <div class="grid lg:grid-cols-2 gap-6">
                    <div class="loading-skeleton h-40 rounded-lg"></div>
                    <div class="loading-skeleton h-40 rounded-lg"></div>
                </div>
            }
        }>
            {move || Suspend::new(async move {
                let metas = projects.await;
                let featured: Vec<_> = metas.iter().filter(|m| m.featured).cloned().collect();
                let picks = if featured.is_empty() {
                    metas.into_iter().take(2).collect::<Vec<_>>()
                } else {
                    featured
                };
                view! {
                    <div class="grid lg:grid-cols-2 gap-6">
                        {picks
                            .into_iter()
                            .map(|meta| {
                                view! {
                                    <A
                                        href=format!("/projects/{}", meta.name)
                                        attr:class="block p-6 rounded-lg bg-brightBlack/20 border border-muted/30 hover:border-cyan/40 transition-colors"
                                    >
                                        <h3 class="text-xl font-bold text-blue mb-2">
                                            {meta.title}
                                        </h3>
                                        <p class="text-sm text-muted mb-4">{meta.summary}</p>
                                        <div class="flex flex-wrap gap-1">
                                            {meta
                                                .tags
                                                .iter()
                                                .map(|tag| {
                                                    view! {
                                                        <span class="rounded-md px-2 py-1 bg-brightBlack mr-2 text-xs">
                                                            {tag.to_string()}
                                                        </span>
                                                    }
                                                })
                                                .collect_view()}
                                        </div>
                                    </A>
                                }
                            })
                            .collect_view()}
                    </div>
                }
            })}
        </Transition>
    }
}
