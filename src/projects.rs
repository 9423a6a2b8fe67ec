use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

#[cfg(feature = "ssr")]
use gray_matter::{engine::YAML, Matter};
#[cfg(feature = "ssr")]
use pulldown_cmark::{Options, Parser};
#[cfg(feature = "ssr")]
use regex::RegexBuilder;

#[cfg(feature = "ssr")]
use crate::highlight::highlight;

pub static GLOBAL_PROJECT_CACHE: LazyLock<DashMap<String, Option<Project>>> =
    LazyLock::new(DashMap::new);
pub static GLOBAL_META_CACHE: LazyLock<DashMap<String, Vec<ProjectMeta>>> =
    LazyLock::new(DashMap::new);

/// Project writeups: Markdown with a YAML front matter block, embedded at
/// build time. The client bundle only carries the file names.
#[derive(Embed)]
#[folder = "projects"]
#[cfg_attr(feature = "hydrate", metadata_only = true)]
pub struct Assets;

#[cfg(feature = "ssr")]
#[derive(Deserialize, Debug, Default)]
struct FrontMatter {
    title: String,
    summary: String,
    date: DateTime<Utc>,
    tags: Vec<String>,
    repo: String,
    #[serde(default)]
    demo: Option<String>,
    #[serde(default)]
    featured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMeta {
    pub name: String,
    pub title: String,
    pub summary: String,
    pub date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub repo: String,
    pub demo: Option<String>,
    pub featured: bool,
}

#[derive(Error, Debug, Clone)]
pub enum ProjectError {
    #[error("Project not found")]
    NotFound,
    #[error("Couldn't parse project entries")]
    ParseError,
}

/// List project metadata, optionally filtered by a case-insensitive regex
/// over the raw writeups. Featured projects sort first, then newest first.
/// The unfiltered listing is cached.
#[cfg(feature = "ssr")]
pub async fn get_meta(pattern: String) -> Option<Vec<ProjectMeta>> {
    let cache = &*GLOBAL_META_CACHE;
    let is_base = pattern.is_empty();
    if is_base {
        if let Some(cached) = cache.get(&pattern) {
            return Some(cached.clone());
        }
    }
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()
        .ok()?;
    let matter = Matter::<YAML>::new();
    let metas = Assets::iter()
        .map(|s| {
            let content = Assets::get(&s).expect("Should be able to get project entry");
            (
                s,
                String::from_utf8(content.data.into()).expect("Couldn't parse project entry"),
            )
        })
        .filter(|(_, content)| is_base || re.is_match(content))
        .map(|(s, content)| {
            let fm = matter.parse_with_struct::<FrontMatter>(&content)?;
            Some(ProjectMeta {
                name: s[..s.len() - 3].to_string(),
                title: fm.data.title,
                summary: fm.data.summary,
                date: fm.data.date,
                tags: fm.data.tags,
                repo: fm.data.repo,
                demo: fm.data.demo,
                featured: fm.data.featured,
            })
        })
        .collect::<Option<Vec<ProjectMeta>>>();
    let metas = metas.map(|mut mv| {
        mv.sort_by(|a, b| (b.featured, b.date).cmp(&(a.featured, a.date)));
        mv
    });
    if is_base {
        cache.insert(pattern, metas.clone().unwrap_or_default());
    }

    metas
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub meta: ProjectMeta,
    pub content: String,
}

/// Render one writeup to HTML (code blocks syntax-highlighted) and cache it.
#[cfg(feature = "ssr")]
pub async fn get_project(name: String) -> Option<Project> {
    let content = Assets::get(&name)?;

    let cache = &*GLOBAL_PROJECT_CACHE;
    cache
        .entry(name.clone())
        .or_insert_with(move || {
            let matter = Matter::<YAML>::new();
            let content =
                &String::from_utf8(content.data.into()).expect("Couldn't parse project entry");

            let fm = matter.parse_with_struct::<FrontMatter>(content)?;
            let meta = ProjectMeta {
                name: name[..name.len() - 3].to_string(),
                title: fm.data.title,
                summary: fm.data.summary,
                date: fm.data.date,
                tags: fm.data.tags,
                repo: fm.data.repo,
                demo: fm.data.demo,
                featured: fm.data.featured,
            };

            let parser = Parser::new_ext(content, Options::all());
            let parser = highlight(parser);

            let mut html_output = String::new();
            pulldown_cmark::html::push_html(&mut html_output, parser);

            Some(Project {
                meta,
                content: html_output,
            })
        })
        .clone()
}

#[cfg(all(test, feature = "ssr"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_embedded_writeup_parses() {
        let metas = get_meta(String::new()).await.expect("metas should parse");
        assert_eq!(metas.len(), Assets::iter().count());
        for meta in &metas {
            assert!(!meta.title.is_empty());
            assert!(!meta.repo.is_empty());
        }
    }

    #[test]
    fn featured_projects_sort_ahead_of_the_rest() {
        let older_featured = ProjectMeta {
            name: "a".into(),
            title: "A".into(),
            summary: String::new(),
            date: "2023-01-01T00:00:00Z".parse().unwrap(),
            tags: Vec::new(),
            repo: "r".into(),
            demo: None,
            featured: true,
        };
        let newer_plain = ProjectMeta {
            date: "2025-01-01T00:00:00Z".parse().unwrap(),
            featured: false,
            ..older_featured.clone()
        };
        let mut metas = vec![newer_plain, older_featured];
        metas.sort_by(|a, b| (b.featured, b.date).cmp(&(a.featured, a.date)));
        assert!(metas[0].featured);
    }

    #[tokio::test]
    async fn rendering_a_writeup_produces_html() {
        let name = Assets::iter().next().expect("at least one project");
        let project = get_project(name.to_string()).await.expect("should render");
        assert!(project.content.contains("<p>"));
    }

    #[tokio::test]
    async fn unknown_project_is_none() {
        assert!(get_project("does-not-exist.md".to_string()).await.is_none());
    }
}
