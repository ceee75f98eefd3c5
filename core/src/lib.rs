pub mod config;
pub mod debounce;
pub mod error;
pub mod index;
pub mod loader;
pub mod panel;
pub mod query;
pub mod render;
pub mod tokenizer;
pub mod widget;

pub use config::{WidgetConfig, SEARCH_RESULT_LIMIT};
pub use error::{ConfigError, LoadError};
pub use index::{DocId, Document, Field, Hit, IndexBuilder, IndexOptions, InvertedIndex, Posting, RawDocument, TermId};
pub use loader::{load, parse_documents, FileSource, HttpSource, IndexSource, LoadedIndex, StaticSource};
pub use panel::{PanelState, PanelView};
pub use query::{LoadState, LoadTicket, SearchContext};
pub use render::{render_search_result, Renderer, SearchResult, TermMatcher};
pub use widget::{drive_load, Key, KeyOutcome, ListenerId, ListenerKind, Page, Widget};
