#![forbid(unsafe_code)]
#![deny(unused_must_use, missing_debug_implementations)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

//! Search, content access and serving for the YX site.

pub mod config;
pub mod content;
pub mod error;
pub mod logging;
pub mod proxy;
pub mod search;
pub mod server;

pub use config::SiteConfig;
pub use content::{CmsClient, ContentRepository, InMemoryRepository};
pub use error::{ConfigError, ContentError, ValidationError};
pub use logging::init_tracing;
pub use search::{CorpusCache, LoadState, SearchSession, SearchView};
