use leptos::server_fn::codec::GetUrl;
use leptos::{html::Input, prelude::*};
use leptos_meta::Title;
use leptos_router::{components::*, hooks::*};

#[cfg(feature = "ssr")]
use crate::projects::{get_meta, get_project};
use crate::projects::{Project, ProjectMeta, GLOBAL_META_CACHE, GLOBAL_PROJECT_CACHE};
use crate::state::prefs::Locale;

use super::tr;

#[component]
pub fn ProjectsWrapper() -> impl IntoView {
    let locale = expect_context::<RwSignal<Locale>>();
    view! {
        <Title text="Projects" />
        <div class="text-center mb-8 pt-12">
            <h1 class="font-bold text-3xl lg:text-4xl mb-4">
                <a href="/projects" class="hover:text-purple transition-colors duration-200">
                    {tr(locale, "projects.title")}
                </a>
            </h1>
            <div class="max-w-2xl mx-auto text-lg font-medium text-muted">
                {tr(locale, "projects.subtitle")}
            </div>
        </div>
        <div class="w-full max-w-4xl mx-auto text-left">
            <Outlet />
        </div>
    }
}

#[server(input = GetUrl)]
pub async fn get_meta_server(pattern: String) -> Result<Vec<ProjectMeta>, ServerFnError> {
    get_meta(pattern)
        .await
        .ok_or(ServerFnError::new("Couldn't parse project entries"))
}

#[component]
pub fn ProjectsHome() -> impl IntoView {
    let locale = expect_context::<RwSignal<Locale>>();
    let (search, set_search) = signal(String::new());
    let input_ref = NodeRef::<Input>::new();
    let projects = Resource::new(move || search.get(), move |search| async move {
        let cache = &*GLOBAL_META_CACHE;
        if let Some(cached) = cache.get(&search) {
            return (*cached).clone();
        }
        let metas = get_meta_server(search.clone()).await.unwrap_or(Vec::new());
        // only cache all searches on the browser
        #[cfg(feature = "hydrate")]
        cache.insert(search, metas.clone());
        metas
    });

    view! {
        <Title text="Projects" />
        <div class="mb-6">
            <form
                class="flex flex-col sm:flex-row gap-3 items-start sm:items-center"
                on:submit=move |ev| {
                    ev.prevent_default();
                    let el = if let Some(el) = input_ref.get_untracked() {
                        el
                    } else {
                        return;
                    };
                    set_search.set(el.value());
                }
            >
                <label for="project_grep" class="font-medium text-cyan whitespace-nowrap">
                    "🔍 " {tr(locale, "projects.searchLabel")}
                </label>
                <div class="flex-grow w-full sm:max-w-md">
                    <input
                        id="project_grep"
                        class="w-full px-4 py-2 rounded-md border border-muted focus:outline-none focus:ring-2 focus:ring-cyan focus:border-cyan bg-background text-foreground placeholder-muted transition-all duration-200"
                        node_ref=input_ref
                        placeholder=tr(locale, "projects.searchPlaceholder")
                    />
                </div>
                <button
                    type="submit"
                    class="px-4 py-2 bg-cyan/20 hover:bg-cyan/30 text-cyan rounded-md border border-cyan/30 transition-all duration-200 whitespace-nowrap"
                >
                    {tr(locale, "projects.searchButton")}
                </button>
            </form>
        </div>
        <div>
            <Transition fallback=move || {
                view! {
                    <div class="space-y-4">
                        <div class="loading-skeleton h-8 rounded"></div>
                        <div class="loading-skeleton h-6 rounded w-3/4"></div>
                        <div class="loading-skeleton h-8 rounded"></div>
                        <div class="loading-skeleton h-6 rounded w-2/3"></div>
                    </div>
                }
            }>
                {move || Suspend::new(async move {
                    let metas = projects.await;
                    if metas.is_empty() {
                        return view! {
                            <p class="text-muted">{tr(locale, "projects.empty")}</p>
                        }
                            .into_any();
                    }
                    view! {
                        <div class="space-y-4">
                            {metas
                                .into_iter()
                                .map(|meta| view! { <ProjectCard meta /> })
                                .collect_view()}
                        </div>
                    }
                        .into_any()
                })}
            </Transition>
        </div>
    }
}

#[component]
fn ProjectCard(meta: ProjectMeta) -> impl IntoView {
    let locale = expect_context::<RwSignal<Locale>>();
    let ProjectMeta {
        name,
        title,
        summary,
        date,
        tags,
        repo,
        demo,
        featured,
    } = meta;
    view! {
        <div class="p-4 rounded-lg bg-brightBlack/10 hover:bg-brightBlack/20 border border-muted/20 transition-colors duration-200">
            <div class="flex items-baseline justify-between gap-4 flex-wrap">
                <A attr:class="text-lg font-bold text-blue hover:text-brightBlue" href=name>
                    {title}
                    {featured.then(|| view! { <span class="ml-2 text-xs text-yellow">"★"</span> })}
                </A>
                <span class="text-sm text-muted">{format!("{}", date.format("%b %e %Y"))}</span>
            </div>
            <p class="text-sm mt-2 mb-3">{summary}</p>
            <div class="flex items-center justify-between flex-wrap gap-2">
                <div>
                    {tags
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
                <div class="flex gap-3 text-sm">
                    <a
                        href=repo
                        target="_blank"
                        rel="noopener noreferrer"
                        class="text-cyan hover:text-brightCyan"
                    >
                        {tr(locale, "projects.viewCode")}
                    </a>
                    {demo
                        .map(|url| {
                            view! {
                                <a
                                    href=url
                                    target="_blank"
                                    rel="noopener noreferrer"
                                    class="text-green hover:text-brightGreen"
                                >
                                    {tr(locale, "projects.viewLive")}
                                </a>
                            }
                        })}
                </div>
            </div>
        </div>
    }
}

#[server(input = GetUrl)]
pub async fn get_project_server(name: String) -> Result<Project, ServerFnError> {
    let name = format!("{name}.md");
    get_project(name)
        .await
        .ok_or(ServerFnError::new("Couldn't get project"))
}

#[component]
pub fn ProjectPage() -> impl IntoView {
    let params = use_params_map();
    let project_name = move || params.get().get("project").unwrap_or_default();
    let project = Resource::new(project_name, move |name| async {
        // take ownership of name
        let name = name;
        let cache = &*GLOBAL_PROJECT_CACHE;
        if let Some(cached) = cache.get(&name) {
            return (*cached)
                .clone()
                .ok_or(ServerFnError::new("Couldn't get project"));
        }
        let project_data = get_project_server(name.clone()).await;
        cache.insert(name, project_data.clone().ok());
        project_data
    });
    let locale = expect_context::<RwSignal<Locale>>();

    view! {
        <Title text="Project" />
        <div id="project_content">
            <Suspense>
                {move || Suspend::new(async move {
                    let project = project.await;
                    project
                        .map(|p| {
                            view! {
                                <div class="mb-6 p-4 bg-brightBlack/20 rounded-md border border-muted/30">
                                    <div class="flex flex-wrap items-center gap-4 text-sm">
                                        <span class="text-yellow font-medium">
                                            "📅 " {p.meta.date.format("%b %e, %Y").to_string()}
                                        </span>
                                        <a
                                            href=p.meta.repo.clone()
                                            target="_blank"
                                            rel="noopener noreferrer"
                                            class="text-cyan hover:text-brightCyan font-medium"
                                        >
                                            {tr(locale, "projects.viewCode")}
                                        </a>
                                        {p
                                            .meta
                                            .demo
                                            .clone()
                                            .map(|url| {
                                                view! {
                                                    <a
                                                        href=url
                                                        target="_blank"
                                                        rel="noopener noreferrer"
                                                        class="text-green hover:text-brightGreen font-medium"
                                                    >
                                                        {tr(locale, "projects.viewLive")}
                                                    </a>
                                                }
                                            })}
                                        <div class="flex flex-wrap gap-1">
                                            {p
                                                .meta
                                                .tags
                                                .into_iter()
                                                .map(|tag| {
                                                    view! {
                                                        <span class="bg-green/20 text-green px-2 py-1 rounded text-xs">
                                                            {tag}
                                                        </span>
                                                    }
                                                })
                                                .collect_view()}
                                        </div>
                                    </div>
                                </div>
                                <article class="prose prose-invert max-w-none">
                                    <div inner_html=p.content></div>
                                </article>
                            }
                        })
                })}
            </Suspense>
        </div>
    }
}
