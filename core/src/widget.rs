//! Visibility, keyboard and focus handling for the search widget.
//!
//! The widget never touches a real document. Everything it needs from the page
//! goes through [`Page`], and every event the page produces comes back in
//! through one of the `on_*` methods. The only asynchronous step, loading the
//! collection, is started by [`Widget::show`] handing out a [`LoadTicket`] and
//! completed by [`Widget::finish_load`] (or [`drive_load`]).

use crate::config::WidgetConfig;
use crate::debounce::Debouncer;
use crate::error::{ConfigError, LoadError};
use crate::index::IndexOptions;
use crate::loader::{load, IndexSource, LoadedIndex};
use crate::panel::{message_html, PanelState, PanelView, MSG_LOADING, MSG_LOADING_ERROR, MSG_NO_TERM};
use crate::query::{LoadTicket, SearchContext};
use crate::render::Renderer;
use std::cell::RefCell;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    KeyUp,
    KeyDown,
    MouseDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The page elements the widget drives: the search input, the results panel
/// and document-level event listeners.
pub trait Page {
    fn set_panel_state(&mut self, state: PanelState);
    fn set_panel_content(&mut self, html: &str);
    fn set_panel_shown(&mut self, shown: bool);

    fn input_value(&self) -> String;
    fn focus_input(&mut self);
    fn select_input(&mut self);
    fn blur_input(&mut self);

    /// Number of rendered `search-result` elements.
    fn result_count(&self) -> usize;
    /// Index of the result element holding focus, if any.
    fn focused_result(&self) -> Option<usize>;
    fn focus_result(&mut self, index: usize);

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId;
    fn remove_listener(&mut self, id: ListenerId);
}

/// Keys the widget reacts to, named after DOM `KeyboardEvent.key` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Slash,
    Escape,
    ArrowUp,
    ArrowDown,
    Other,
}

impl From<&str> for Key {
    fn from(key: &str) -> Self {
        match key {
            "/" => Key::Slash,
            "Escape" => Key::Escape,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    pub prevent_default: bool,
}

/// The keydown/mousedown pair held while the panel is visible.
#[derive(Debug)]
struct GlobalListeners {
    keydown: ListenerId,
    mousedown: ListenerId,
}

impl GlobalListeners {
    fn acquire<P: Page>(page: &mut P) -> Self {
        Self { keydown: page.add_listener(ListenerKind::KeyDown), mousedown: page.add_listener(ListenerKind::MouseDown) }
    }

    fn release<P: Page>(self, page: &mut P) {
        page.remove_listener(self.keydown);
        page.remove_listener(self.mousedown);
    }
}

#[derive(Debug, Default)]
enum Visibility {
    #[default]
    Hidden,
    Visible(GlobalListeners),
}

pub struct Widget<P: Page> {
    page: P,
    search: SearchContext,
    renderer: Renderer,
    debouncer: Debouncer,
    index_options: IndexOptions,
    visibility: Visibility,
    keyup: Option<ListenerId>,
    panel_state: PanelState,
}

impl<P: Page> Widget<P> {
    /// Fails when `config` does not validate.
    pub fn new(page: P, config: &WidgetConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            page,
            search: SearchContext::new(config.result_limit),
            renderer: Renderer::from_config(config),
            debouncer: Debouncer::new(config.debounce()),
            index_options: config.index,
            visibility: Visibility::Hidden,
            keyup: None,
            panel_state: PanelState::NoTerm,
        })
    }

    /// Attach the permanent `/` shortcut listener and seed the panel text.
    pub fn mount(&mut self) {
        if self.keyup.is_none() {
            self.keyup = Some(self.page.add_listener(ListenerKind::KeyUp));
            self.set_state(PanelState::NoTerm, Some(MSG_NO_TERM));
        }
    }

    /// Hide and detach every listener the widget owns.
    pub fn unmount(&mut self) {
        self.hide();
        self.debouncer.cancel();
        if let Some(id) = self.keyup.take() {
            self.page.remove_listener(id);
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn search_context(&self) -> &SearchContext {
        &self.search
    }

    pub fn index_options(&self) -> IndexOptions {
        self.index_options
    }

    pub fn panel_state(&self) -> PanelState {
        self.panel_state
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.visibility, Visibility::Visible(_))
    }

    /// When the pending debounced query is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Reveal the panel. Returns a ticket when the caller must load the
    /// collection and report back through [`Widget::finish_load`].
    pub fn show(&mut self) -> Option<LoadTicket> {
        if self.is_visible() {
            return None;
        }
        let listeners = GlobalListeners::acquire(&mut self.page);
        self.visibility = Visibility::Visible(listeners);
        self.page.set_panel_shown(true);
        tracing::debug!("search panel shown");

        if self.search.is_loaded() {
            return None;
        }
        let ticket = self.search.begin_load()?;
        self.set_state(PanelState::Loading, Some(MSG_LOADING));
        Some(ticket)
    }

    pub fn hide(&mut self) {
        if let Visibility::Visible(listeners) = std::mem::take(&mut self.visibility) {
            listeners.release(&mut self.page);
            self.page.set_panel_shown(false);
            tracing::debug!("search panel hidden");
        }
    }

    pub fn on_input_focus(&mut self) -> Option<LoadTicket> {
        self.show()
    }

    pub fn on_input(&mut self, now: Instant) {
        self.debouncer.trigger(now);
    }

    /// Run the debounced query if it is due. Returns whether it ran.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if !self.debouncer.fire(now) {
            return false;
        }
        self.refresh();
        true
    }

    /// Run the current input through the query engine and update the panel.
    /// Leaves the panel untouched while the collection is not loaded.
    pub fn refresh(&mut self) {
        let input = self.page.input_value();
        let Some(view) = PanelView::resolve(&self.search, &self.renderer, &input) else {
            return;
        };
        match view.message() {
            Some(message) => self.set_state(view.state(), Some(&message)),
            None => {
                self.page.set_panel_content(&view.html());
                self.set_state(view.state(), None);
            }
        }
    }

    pub fn on_document_keyup(&mut self, key: &str) {
        if Key::from(key) == Key::Slash {
            self.page.focus_input();
            self.page.select_input();
        }
    }

    pub fn on_document_keydown(&mut self, key: &str) -> KeyOutcome {
        if !self.is_visible() {
            return KeyOutcome::default();
        }
        match Key::from(key) {
            Key::Escape => {
                self.page.blur_input();
                self.hide();
                KeyOutcome::default()
            }
            Key::ArrowUp => {
                self.move_focus(-1);
                KeyOutcome { prevent_default: true }
            }
            Key::ArrowDown => {
                self.move_focus(1);
                KeyOutcome { prevent_default: true }
            }
            Key::Slash | Key::Other => KeyOutcome::default(),
        }
    }

    /// A mouse press somewhere in the document; `inside_widget` tells whether
    /// its target lies within the search container.
    pub fn on_document_mousedown(&mut self, inside_widget: bool) {
        if self.is_visible() && !inside_widget {
            self.hide();
        }
    }

    pub fn finish_load(&mut self, ticket: LoadTicket, outcome: Result<LoadedIndex, LoadError>) {
        let ok = outcome.is_ok();
        if !self.search.finish_load(ticket, outcome) {
            return;
        }
        if !ok {
            self.set_state(PanelState::LoadingError, Some(MSG_LOADING_ERROR));
        } else if self.is_visible() {
            self.refresh();
        } else {
            self.set_state(PanelState::NoTerm, Some(MSG_NO_TERM));
        }
    }

    fn move_focus(&mut self, offset: isize) {
        let target = match self.page.focused_result() {
            Some(current) => current as isize + offset,
            None => 0,
        };
        if target >= 0 && (target as usize) < self.page.result_count() {
            self.page.focus_result(target as usize);
        }
    }

    fn set_state(&mut self, state: PanelState, description: Option<&str>) {
        self.panel_state = state;
        self.page.set_panel_state(state);
        if let Some(description) = description {
            self.page.set_panel_content(&message_html(description));
        }
    }
}

/// Load the collection for `ticket` and hand the outcome to the widget. The
/// widget is not borrowed while the fetch is pending, so page events keep
/// flowing in the meantime.
pub async fn drive_load<P: Page, S: IndexSource>(widget: &RefCell<Widget<P>>, ticket: LoadTicket, source: &S) {
    let options = widget.borrow().index_options();
    let outcome = load(source, options).await;
    widget.borrow_mut().finish_load(ticket, outcome);
}
