use clap::Args;

use super::CommonArgs;
use crate::output::format_downloads;
use crate::run_cli_async;

#[derive(Args, Debug, Clone)]
pub struct DownloadsArgs {
    #[arg(long, help = "Print the listing as JSON")]
    pub json: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn run(args: DownloadsArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: DownloadsArgs) -> Result<(), String> {
    let (_, client) = args.common.cms_client()?;
    let items = client
        .fetch_downloads()
        .await
        .map_err(|err| err.to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(&items)
            .map_err(|err| format!("Failed to serialize downloads: {err}"))?;
        println!("{json}");
    } else if items.is_empty() {
        println!("No downloads published.");
    } else {
        print!("{}", format_downloads(&items));
    }
    Ok(())
}
