use clap::Args;

use super::CommonArgs;
use crate::output::format_categories;
use crate::run_cli_async;

#[derive(Args, Debug, Clone)]
pub struct CategoriesArgs {
    #[arg(long, help = "Print the categories as JSON")]
    pub json: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn run(args: CategoriesArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: CategoriesArgs) -> Result<(), String> {
    let (_, client) = args.common.cms_client()?;
    let categories = client
        .fetch_categories()
        .await
        .map_err(|err| err.to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(&categories)
            .map_err(|err| format!("Failed to serialize categories: {err}"))?;
        println!("{json}");
    } else if categories.is_empty() {
        println!("No product categories.");
    } else {
        print!("{}", format_categories(&categories));
    }
    Ok(())
}
