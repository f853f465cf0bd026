use clap::Args;
use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use yx_core::content::{ContentRepository, InMemoryRepository};
use yx_core::search::{CorpusCache, DismissReason, SearchSession};

use super::CommonArgs;
use crate::output::format_view;
use crate::run_cli_async;

/// Extra wait after the debounce delay before rendering.
const RENDER_SLACK: Duration = Duration::from_millis(20);

#[derive(Args, Debug, Clone)]
pub struct InteractiveArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Search a JSON corpus file instead of the CMS"
    )]
    pub corpus: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn run(args: InteractiveArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: InteractiveArgs) -> Result<(), String> {
    let config = args.common.load_config()?;
    let cache = Arc::new(CorpusCache::new(config.search.article_limit));
    let debounce = config.search.debounce();

    match &args.corpus {
        Some(path) => {
            let repository =
                InMemoryRepository::from_json_file(path).map_err(|err| err.to_string())?;
            repl(SearchSession::new(Arc::new(repository), cache, debounce), debounce).await
        }
        None => {
            let (_, client) = args.common.cms_client()?;
            repl(SearchSession::new(Arc::new(client), cache, debounce), debounce).await
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Quit,
    Escape,
    Clear,
    Open(usize),
    Query(&'a str),
}

fn parse_line(line: &str) -> Line<'_> {
    match line.trim() {
        ":q" | ":quit" => Line::Quit,
        ":esc" => Line::Escape,
        ":clear" => Line::Clear,
        other => match other.strip_prefix(":open ").map(str::trim) {
            Some(index) => match index.parse::<usize>() {
                Ok(n) if n > 0 => Line::Open(n - 1),
                _ => Line::Query(line),
            },
            None => Line::Query(line),
        },
    }
}

async fn repl<R: ContentRepository + 'static>(
    session: SearchSession<R>,
    debounce: Duration,
) -> Result<(), String> {
    if session.activate().is_some() {
        debug!("Corpus loading in the background.");
    }
    println!(
        "{}",
        style("Type a query. :open N follows a result, :esc dismisses, :q quits.").dim()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|err| format!("Failed to read input: {err}"))?
    {
        match parse_line(&line) {
            Line::Quit => break,
            Line::Escape => {
                session.dismiss(DismissReason::Escape);
                session.activate();
            }
            Line::Clear => session.clear(),
            Line::Open(index) => match session.select(index) {
                Some(target) => {
                    println!("→ {}", style(target).underlined());
                    session.activate();
                    continue;
                }
                None => println!("{}", style("No such result.").yellow()),
            },
            Line::Query(text) => {
                session.input(text);
                tokio::time::sleep(debounce + RENDER_SLACK).await;
            }
        }
        println!("{}", format_view(&session.view()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line(":q"), Line::Quit);
        assert_eq!(parse_line(" :esc "), Line::Escape);
        assert_eq!(parse_line(":clear"), Line::Clear);
        assert_eq!(parse_line(":open 2"), Line::Open(1));
        assert_eq!(parse_line(":open 0"), Line::Query(":open 0"));
        assert_eq!(parse_line("fanless box"), Line::Query("fanless box"));
    }
}
