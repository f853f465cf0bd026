//! Product and news search.
//!
//! [`engine::search`] is the pure ranking function. [`CorpusCache`] owns the
//! records it ranks, and [`SearchSession`] drives both from debounced user input.

pub mod corpus;
pub mod debounce;
pub mod engine;
pub mod session;
pub mod weights;

pub use corpus::{Corpus, CorpusCache, DEFAULT_ARTICLE_LIMIT, LoadState};
pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use engine::{MAX_RESULTS, NO_DESCRIPTION, SNIPPET_CHARS, search};
pub use session::{DismissReason, SearchSession, SearchView};
