#![allow(dead_code)]

use sitesearch_core::{ListenerId, ListenerKind, Page, PanelState};
use std::collections::HashMap;

/// In-memory stand-in for the page: records what the widget did to it.
#[derive(Default)]
pub struct FakePage {
    pub state: Option<PanelState>,
    pub content: String,
    pub shown: bool,
    pub input: String,
    pub input_focused: bool,
    pub input_selected: bool,
    pub focused_result: Option<usize>,
    pub listeners: HashMap<ListenerId, ListenerKind>,
    next_listener: u64,
}

impl FakePage {
    pub fn active(&self, kind: ListenerKind) -> usize {
        self.listeners.values().filter(|k| **k == kind).count()
    }

    /// Rendered result entries, counted the way the page would select them.
    pub fn results(&self) -> usize {
        self.content.matches(r#"class="search-result""#).count()
    }
}

impl Page for FakePage {
    fn set_panel_state(&mut self, state: PanelState) {
        self.state = Some(state);
    }

    fn set_panel_content(&mut self, html: &str) {
        self.content = html.to_string();
        self.focused_result = None;
    }

    fn set_panel_shown(&mut self, shown: bool) {
        self.shown = shown;
    }

    fn input_value(&self) -> String {
        self.input.clone()
    }

    fn focus_input(&mut self) {
        self.input_focused = true;
        self.focused_result = None;
    }

    fn select_input(&mut self) {
        self.input_selected = true;
    }

    fn blur_input(&mut self) {
        self.input_focused = false;
    }

    fn result_count(&self) -> usize {
        self.results()
    }

    fn focused_result(&self) -> Option<usize> {
        self.focused_result
    }

    fn focus_result(&mut self, index: usize) {
        self.input_focused = false;
        self.focused_result = Some(index);
    }

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id, kind);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }
}

pub const PETS_JSON: &str = r#"[
    {"title": "Cats", "content": "Cats are great pets", "url": "/cats"},
    {"title": "Dogs", "content": "Dogs are loyal", "url": "/dogs"}
]"#;

/// Five documents that all mention rust, so a query fills every result slot.
pub fn rust_json() -> String {
    let docs: Vec<String> = (0..5)
        .map(|i| format!(r#"{{"title": "Rust post {i}", "content": "Notes on rust number {i}", "url": "/rust/{i}"}}"#))
        .collect();
    format!("[{}]", docs.join(","))
}
