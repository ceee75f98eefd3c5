use crate::config::SEARCH_RESULT_LIMIT;
use crate::error::LoadError;
use crate::index::Document;
use crate::loader::LoadedIndex;

#[derive(Debug, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loading,
    Loaded(LoadedIndex),
    Failed(String),
}

/// Proof that a load was started; handed back with its outcome.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket {
    generation: u64,
}

/// Per-widget search state: the loaded collection (if any) and the result limit.
#[derive(Debug)]
pub struct SearchContext {
    state: LoadState,
    generation: u64,
    result_limit: usize,
}

impl Default for SearchContext {
    fn default() -> Self {
        Self::new(SEARCH_RESULT_LIMIT)
    }
}

impl SearchContext {
    pub fn new(result_limit: usize) -> Self {
        Self { state: LoadState::Unloaded, generation: 0, result_limit }
    }

    pub fn with_index(loaded: LoadedIndex, result_limit: usize) -> Self {
        Self { state: LoadState::Loaded(loaded), generation: 0, result_limit }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, LoadState::Loaded(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    pub fn loaded(&self) -> Option<&LoadedIndex> {
        match &self.state {
            LoadState::Loaded(loaded) => Some(loaded),
            _ => None,
        }
    }

    /// Start a load unless one is in flight or already succeeded.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        match self.state {
            LoadState::Unloaded | LoadState::Failed(_) => {
                self.generation += 1;
                self.state = LoadState::Loading;
                Some(LoadTicket { generation: self.generation })
            }
            LoadState::Loading | LoadState::Loaded(_) => None,
        }
    }

    /// Record the outcome of a load. Returns false when the ticket is stale.
    pub fn finish_load(&mut self, ticket: LoadTicket, outcome: Result<LoadedIndex, LoadError>) -> bool {
        if ticket.generation != self.generation || !self.is_loading() {
            tracing::debug!(ticket = ticket.generation, current = self.generation, "dropping stale load result");
            return false;
        }
        self.state = match outcome {
            Ok(loaded) => LoadState::Loaded(loaded),
            Err(err) => LoadState::Failed(err.to_string()),
        };
        true
    }

    /// Forget the loaded collection; any load still in flight becomes stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = LoadState::Unloaded;
    }

    /// Ranked documents for `term`, or `None` while nothing is loaded.
    pub fn search(&self, term: &str) -> Option<Vec<&Document>> {
        let loaded = self.loaded()?;
        let docs = loaded
            .index()
            .query(term)
            .into_iter()
            .filter_map(|hit| loaded.doc(hit.doc_id))
            .take(self.result_limit)
            .collect();
        Some(docs)
    }
}
