use std::sync::LazyLock;
use std::vec::IntoIter;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// Syntax sets are expensive to load, so one instance serves every render.
static HIGHLIGHTER: LazyLock<CodeHighlighter> = LazyLock::new(CodeHighlighter::new);

struct CodeHighlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl CodeHighlighter {
    fn new() -> CodeHighlighter {
        let syntaxes = SyntaxSet::load_defaults_newlines();
        let mut themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .remove("base16-eighties.dark")
            .expect("bundled theme set always carries base16-eighties.dark");
        CodeHighlighter { syntaxes, theme }
    }

    /// Replace fenced code blocks in a pulldown-cmark event stream with
    /// pre-rendered highlighted HTML. Unknown languages fall back to plain
    /// text rather than failing the render.
    fn rewrite<'a>(&self, events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
        let mut syntax = self.syntaxes.find_syntax_plain_text();
        let mut in_code_block = false;
        let mut code = String::new();
        let mut out = Vec::new();

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    if let CodeBlockKind::Fenced(lang) = kind {
                        syntax = self.syntaxes.find_syntax_by_token(&lang).unwrap_or(syntax);
                    }
                    in_code_block = true;
                }
                Event::End(TagEnd::CodeBlock) if in_code_block => {
                    let html =
                        highlighted_html_for_string(&code, &self.syntaxes, syntax, &self.theme)
                            .unwrap_or_else(|_| format!("<pre><code>{code}</code></pre>"));
                    code.clear();
                    in_code_block = false;
                    syntax = self.syntaxes.find_syntax_plain_text();
                    out.push(Event::Html(CowStr::from(html)));
                }
                Event::Text(text) if in_code_block => code.push_str(&text),
                other => out.push(other),
            }
        }

        out
    }
}

/// Apply syntax highlighting to a pulldown-cmark event stream.
pub fn highlight<'a, It>(events: It) -> IntoIter<Event<'a>>
where
    It: Iterator<Item = Event<'a>>,
{
    HIGHLIGHTER.rewrite(events).into_iter()
}

#[cfg(test)]
mod tests {
    use pulldown_cmark::Parser;

    use super::*;

    fn render(markdown: &str) -> String {
        let events = highlight(Parser::new(markdown));
        let mut html = String::new();
        pulldown_cmark::html::push_html(&mut html, events);
        html
    }

    #[test]
    fn fenced_rust_blocks_become_highlighted_html() {
        let html = render("```rust\nfn main() {}\n```");
        assert!(html.contains("<pre"));
        assert!(html.contains("style"));
    }

    #[test]
    fn unknown_languages_still_render() {
        let html = render("```nosuchlang\nplain text\n```");
        assert!(html.contains("plain text"));
    }

    #[test]
    fn prose_passes_through_untouched() {
        let html = render("Just a *paragraph*.");
        assert!(html.contains("<em>paragraph</em>"));
    }
}
