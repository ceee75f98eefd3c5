//! Highlighted titles and excerpts for matched documents.

use crate::config::WidgetConfig;
use crate::index::Document;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// Case-insensitive alternation of the whitespace-separated words of a query.
#[derive(Debug, Clone)]
pub struct TermMatcher {
    re: Regex,
}

impl TermMatcher {
    /// `None` when the term has no words.
    pub fn new(term: &str) -> Option<Self> {
        let alternatives: Vec<String> = term.split_whitespace().map(regex::escape).collect();
        if alternatives.is_empty() {
            return None;
        }
        let re = RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .build()
            .ok()?;
        Some(Self { re })
    }

    /// Byte range of the first match in `text`.
    pub fn first_match(&self, text: &str) -> Option<(usize, usize)> {
        self.re.find(text).map(|m| (m.start(), m.end()))
    }
}

/// Escape `text` and wrap every match in `<mark>`. Matching runs on the raw
/// text, so entities introduced by escaping are never highlighted.
pub fn highlight(text: &str, matcher: &TermMatcher) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for m in matcher.re.find_iter(text) {
        out.push_str(&htmlescape::encode_minimal(&text[last..m.start()]));
        out.push_str("<mark>");
        out.push_str(&htmlescape::encode_minimal(m.as_str()));
        out.push_str("</mark>");
        last = m.end();
    }
    out.push_str(&htmlescape::encode_minimal(&text[last..]));
    out
}

/// The window of `content` around its first match, `before` characters ahead
/// of the match and `after` characters past it, clamped to the string.
pub fn excerpt<'a>(content: &'a str, matcher: &TermMatcher, before: usize, after: usize) -> Option<&'a str> {
    let (start, end) = matcher.first_match(content)?;
    let start_char = content[..start].chars().count().saturating_sub(before);
    let end_char = content[..end].chars().count().saturating_add(after);
    let byte_at = |char_idx: usize| content.char_indices().nth(char_idx).map(|(b, _)| b).unwrap_or(content.len());
    Some(&content[byte_at(start_char)..byte_at(end_char)])
}

/// One rendered entry: markup for the title and excerpt, and the plain url.
/// The url is attribute-encoded when the entry is turned into HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub content: Option<String>,
    pub url: String,
}

impl SearchResult {
    pub fn to_html(&self) -> String {
        let mut html = format!(
            r#"<a href="{}" class="search-result"><p class="search-result-title">{}</p>"#,
            htmlescape::encode_attribute(&self.url),
            self.title
        );
        if let Some(content) = &self.content {
            html.push_str(&format!(r#"<p class="excerpt">...{content}...</p>"#));
        }
        html.push_str(r#"</a><div class="divider"></div>"#);
        html
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub excerpt_before: usize,
    pub excerpt_after: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::from_config(&WidgetConfig::default())
    }
}

impl Renderer {
    pub fn from_config(cfg: &WidgetConfig) -> Self {
        Self { excerpt_before: cfg.excerpt_before, excerpt_after: cfg.excerpt_after }
    }

    pub fn render(&self, term: &str, doc: &Document) -> SearchResult {
        let url = doc.url.clone();
        let Some(matcher) = TermMatcher::new(term) else {
            return SearchResult { title: htmlescape::encode_minimal(&doc.title), content: None, url };
        };
        let title = highlight(&doc.title, &matcher);
        let content = excerpt(&doc.content, &matcher, self.excerpt_before, self.excerpt_after)
            .map(|window| highlight(window, &matcher));
        SearchResult { title, content, url }
    }

    /// Render matched documents in ranked order into one fragment.
    pub fn render_all(&self, term: &str, docs: &[&Document]) -> String {
        docs.iter().map(|doc| self.render(term, doc).to_html()).collect()
    }
}

pub fn render_search_result(term: &str, doc: &Document) -> SearchResult {
    Renderer::default().render(term, doc)
}
