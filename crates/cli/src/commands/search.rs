use clap::Args;
use std::path::PathBuf;
use tracing::debug;
use yx_core::content::{ContentRepository, InMemoryRepository};
use yx_core::search::{CorpusCache, LoadState};

use super::CommonArgs;
use crate::output::{format_results, search_json};
use crate::run_cli_async;

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[arg(value_name = "QUERY", help = "Text to search for")]
    pub query: String,

    #[arg(
        long,
        value_name = "FILE",
        help = "Search a JSON corpus file instead of the CMS"
    )]
    pub corpus: Option<PathBuf>,

    #[arg(long, help = "Print results as JSON")]
    pub json: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn run(args: SearchArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: SearchArgs) -> Result<(), String> {
    let output = match &args.corpus {
        Some(path) => {
            let repository =
                InMemoryRepository::from_json_file(path).map_err(|err| err.to_string())?;
            search_repository(&repository, usize::MAX, &args).await?
        }
        None => {
            let (config, client) = args.common.cms_client()?;
            search_repository(&client, config.search.article_limit, &args).await?
        }
    };
    print!("{output}");
    Ok(())
}

async fn search_repository<R: ContentRepository>(
    repository: &R,
    article_limit: usize,
    args: &SearchArgs,
) -> Result<String, String> {
    let cache = CorpusCache::new(article_limit);
    let state = cache.load(repository).await;
    if state == LoadState::Failed {
        debug!("Corpus unavailable, results will be empty.");
    }
    let results = cache.search(&args.query);

    if args.json {
        return search_json(&args.query, state, &results).map(|json| format!("{json}\n"));
    }
    if results.is_empty() {
        return Ok(format!("No results for \"{}\".\n", args.query));
    }
    Ok(format_results(&results))
}
