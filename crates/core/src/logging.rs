//! Tracing setup shared by the `yx` binary and the site server.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Environment variable controlling the log filter.
pub const LOG_ENV: &str = "YX_LOG";

const WORKSPACE_CRATES: [&str; 4] = ["yx", "yx_cli", "yx_core", "yx_common"];

/// Initialize the global subscriber: fmt layer on stderr, filtered by `YX_LOG`.
pub fn init_tracing() {
    let filter = filter_spec(std::env::var(LOG_ENV).ok().as_deref());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

/// `YX_LOG` accepts a plain level ("trace", "debug", "info", "warn", "error"),
/// applied to the workspace crates, or a full filter spec like
/// "yx_core=debug,reqwest=warn".
pub fn filter_spec(value: Option<&str>) -> String {
    match value {
        Some(level) if is_plain_level(level) => crate_filter(&level.to_ascii_lowercase()),
        Some(spec) if !spec.trim().is_empty() => spec.to_string(),
        _ => crate_filter("info"),
    }
}

fn crate_filter(level: &str) -> String {
    WORKSPACE_CRATES
        .iter()
        .map(|name| format!("{name}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
