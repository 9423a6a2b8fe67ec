use leptos::prelude::*;
use leptos_meta::Title;

use crate::state::prefs::Locale;

use super::tr;

#[component]
pub fn AboutPage() -> impl IntoView {
    let locale = expect_context::<RwSignal<Locale>>();

    let stacks: [(&'static str, &'static [&'static str]); 3] = [
        ("Languages", &["Rust", "TypeScript", "Python", "SQL"]),
        (
            "Frameworks",
            &["Leptos", "axum", "SvelteKit", "React", "tokio"],
        ),
        (
            "Tools",
            &["PostgreSQL", "SQLite", "Docker", "Grafana", "fly.io"],
        ),
    ];

    view! {
        <Title text="About Me" />
        <div class="max-w-4xl mx-auto py-12">
            <h1 class="text-4xl font-bold mb-2">{tr(locale, "about.title")}</h1>
            <p class="text-muted mb-10">{tr(locale, "about.subtitle")}</p>

            <div class="space-y-4 leading-relaxed mb-12">
                <p>{tr(locale, "about.p1")}</p>
                <p>{tr(locale, "about.p2")}</p>
                <p>{tr(locale, "about.p3")}</p>
            </div>

            <h2 class="text-2xl font-bold mb-6">{tr(locale, "about.skillsTitle")}</h2>
            <div class="grid sm:grid-cols-3 gap-6">
                {stacks
                    .into_iter()
                    .map(|(group, items)| {
                        view! {
                            <div class="bg-brightBlack/20 p-4 rounded-lg border border-muted/30">
                                <h3 class="font-medium text-cyan mb-3">{group}</h3>
                                <ul class="space-y-1 text-sm">
                                    {items
                                        .iter()
                                        .map(|item| view! { <li>{*item}</li> })
                                        .collect_view()}
                                </ul>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>

            <div class="bg-brightBlack/30 p-4 rounded-md border-l-4 border-purple mt-12">
                <p class="text-sm text-purple mb-2 font-medium">
                    "💡 Open to interesting collaborations"
                </p>
                <p class="text-sm">
                    "I'm happiest on products where the frontend and the data layer are designed together. If that sounds like your project, say hello."
                </p>
            </div>
        </div>
    }
}
