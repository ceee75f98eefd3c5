//! What the results panel shows for a given input.

use crate::query::SearchContext;
use crate::render::{Renderer, SearchResult};
use serde::Serialize;

pub const MSG_LOADING: &str = "Loading...";
pub const MSG_LOADING_ERROR: &str = "Failed to load search data";
pub const MSG_NO_TERM: &str = "Enter a search term";

/// The panel's `data-state` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelState {
    Loading,
    LoadingError,
    HasResults,
    NoResults,
    NoTerm,
}

impl PanelState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelState::Loading => "loading",
            PanelState::LoadingError => "loading-error",
            PanelState::HasResults => "has-results",
            PanelState::NoResults => "no-results",
            PanelState::NoTerm => "no-term",
        }
    }
}

pub fn no_results_message(term: &str) -> String {
    format!("No results for \"{term}\"")
}

/// Panel markup for a plain-text status message.
pub fn message_html(message: &str) -> String {
    format!(r#"<span class="search-message">{}</span>"#, htmlescape::encode_minimal(message))
}

/// The outcome of running the input through the query engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView {
    NoTerm,
    NoResults { term: String },
    Results { term: String, results: Vec<SearchResult> },
}

impl PanelView {
    /// Trim the raw input and query `search`. `None` while nothing is loaded,
    /// meaning the panel should be left as it is.
    pub fn resolve(search: &SearchContext, renderer: &Renderer, input: &str) -> Option<Self> {
        let term = input.trim();
        if term.is_empty() {
            return Some(PanelView::NoTerm);
        }
        let docs = search.search(term)?;
        tracing::debug!(term, hits = docs.len(), "search");
        if docs.is_empty() {
            return Some(PanelView::NoResults { term: term.to_string() });
        }
        let results = docs.iter().map(|doc| renderer.render(term, doc)).collect();
        Some(PanelView::Results { term: term.to_string(), results })
    }

    pub fn state(&self) -> PanelState {
        match self {
            PanelView::NoTerm => PanelState::NoTerm,
            PanelView::NoResults { .. } => PanelState::NoResults,
            PanelView::Results { .. } => PanelState::HasResults,
        }
    }

    pub fn message(&self) -> Option<String> {
        match self {
            PanelView::NoTerm => Some(MSG_NO_TERM.to_string()),
            PanelView::NoResults { term } => Some(no_results_message(term)),
            PanelView::Results { .. } => None,
        }
    }

    pub fn results(&self) -> &[SearchResult] {
        match self {
            PanelView::Results { results, .. } => results,
            _ => &[],
        }
    }

    /// Full panel content.
    pub fn html(&self) -> String {
        match self.message() {
            Some(message) => message_html(&message),
            None => self.results().iter().map(SearchResult::to_html).collect(),
        }
    }
}
