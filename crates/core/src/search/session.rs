//! Interactive search session.
//!
//! A [`SearchSession`] is the state behind one search surface: the query text,
//! the results on display, and whether the surface is open. Input is debounced
//! before it is searched; dismissal is not. Every input bumps a sequence
//! number and a finished search is only applied if its sequence number is
//! still the latest, so an older query can never overwrite a newer one.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;
use yx_common::SearchResult;

use super::corpus::{CorpusCache, LoadState};
use super::debounce::Debouncer;
use crate::content::ContentRepository;

/// What the surface should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchView {
    /// Nothing typed.
    Idle,
    /// A query is waiting on the debounce delay.
    Loading,
    NoResults,
    Results(Vec<SearchResult>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Escape,
    OutsideClick,
}

impl DismissReason {
    fn as_str(self) -> &'static str {
        match self {
            DismissReason::Escape => "escape",
            DismissReason::OutsideClick => "outside_click",
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    open: bool,
    query: String,
    results: Vec<SearchResult>,
    pending: bool,
    searched: bool,
    seq: u64,
    last_searched: Option<String>,
}

impl SessionState {
    /// Forget the query and anything derived from it.
    fn reset(&mut self) {
        self.seq += 1;
        self.query.clear();
        self.results.clear();
        self.pending = false;
        self.searched = false;
    }
}

#[derive(Debug)]
struct Shared {
    cache: Arc<CorpusCache>,
    state: Mutex<SessionState>,
    searches: AtomicUsize,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Search the current query if `seq` is still the latest input.
    fn execute(&self, seq: u64) {
        let query = {
            let state = self.state();
            if state.seq != seq {
                return;
            }
            state.query.clone()
        };

        let results = self.cache.search(&query);

        let mut state = self.state();
        if state.seq != seq {
            debug!(query, "Discarding results for superseded query.");
            return;
        }
        self.searches.fetch_add(1, Ordering::SeqCst);
        debug!(query, results = results.len(), "Search results updated.");
        state.results = results;
        state.pending = false;
        state.searched = true;
        state.last_searched = Some(query);
    }

    /// Re-run an already displayed query once the corpus has arrived.
    fn refresh(&self) {
        let seq = {
            let state = self.state();
            if !state.searched || state.pending || state.query.trim().is_empty() {
                return;
            }
            state.seq
        };
        self.execute(seq);
    }
}

pub struct SearchSession<R> {
    repository: Arc<R>,
    shared: Arc<Shared>,
    debouncer: Debouncer<u64>,
}

impl<R> fmt::Debug for SearchSession<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchSession")
            .field("shared", &self.shared)
            .field("debouncer", &self.debouncer)
            .finish_non_exhaustive()
    }
}

impl<R: ContentRepository + 'static> SearchSession<R> {
    pub fn new(repository: Arc<R>, cache: Arc<CorpusCache>, debounce: Duration) -> Self {
        let shared = Arc::new(Shared {
            cache,
            state: Mutex::new(SessionState::default()),
            searches: AtomicUsize::new(0),
        });
        let target = Arc::clone(&shared);
        let debouncer = Debouncer::new(debounce, move |seq| target.execute(seq));
        Self {
            repository,
            shared,
            debouncer,
        }
    }

    /// Open the surface. The first activation starts the corpus load in the
    /// background and returns its handle; input is accepted meanwhile.
    pub fn activate(&self) -> Option<JoinHandle<LoadState>> {
        self.shared.state().open = true;
        if self.shared.cache.state() != LoadState::Idle {
            return None;
        }

        let shared = Arc::clone(&self.shared);
        let repository = Arc::clone(&self.repository);
        Some(tokio::spawn(async move {
            let state = shared.cache.load(repository.as_ref()).await;
            shared.refresh();
            state
        }))
    }

    /// Replace the query text. Blank input goes straight back to idle.
    pub fn input(&self, text: &str) {
        let seq = {
            let mut state = self.shared.state();
            state.seq += 1;
            text.clone_into(&mut state.query);
            if text.trim().is_empty() {
                state.results.clear();
                state.pending = false;
                state.searched = false;
                None
            } else {
                state.pending = true;
                Some(state.seq)
            }
        };

        match seq {
            Some(seq) => self.debouncer.call(seq),
            None => self.debouncer.cancel(),
        }
    }

    /// Close the surface immediately, dropping any pending search.
    pub fn dismiss(&self, reason: DismissReason) {
        self.debouncer.cancel();
        let mut state = self.shared.state();
        state.reset();
        state.open = false;
        debug!(reason = reason.as_str(), "Search dismissed.");
    }

    /// Clear the query but keep the surface open.
    pub fn clear(&self) {
        self.debouncer.cancel();
        self.shared.state().reset();
    }

    /// Follow the result at `index`: returns its target and closes the surface.
    pub fn select(&self, index: usize) -> Option<String> {
        let target = self
            .shared
            .state()
            .results
            .get(index)
            .map(|result| result.target_url.clone())?;
        self.debouncer.cancel();
        let mut state = self.shared.state();
        state.reset();
        state.open = false;
        Some(target)
    }
}

impl<R> SearchSession<R> {
    pub fn view(&self) -> SearchView {
        let state = self.shared.state();
        if state.query.trim().is_empty() {
            SearchView::Idle
        } else if state.pending || !state.searched {
            SearchView::Loading
        } else if state.results.is_empty() {
            SearchView::NoResults
        } else {
            SearchView::Results(state.results.clone())
        }
    }

    pub fn query(&self) -> String {
        self.shared.state().query.clone()
    }

    pub fn results(&self) -> Vec<SearchResult> {
        self.shared.state().results.clone()
    }

    pub fn is_open(&self) -> bool {
        self.shared.state().open
    }

    /// Searches whose results were displayed; superseded ones are not counted.
    pub fn search_count(&self) -> usize {
        self.shared.searches.load(Ordering::SeqCst)
    }

    pub fn last_searched(&self) -> Option<String> {
        self.shared.state().last_searched.clone()
    }

    pub fn load_state(&self) -> LoadState {
        self.shared.cache.state()
    }
}
