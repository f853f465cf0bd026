use clap::Args;

use super::CommonArgs;
use crate::output::format_product;
use crate::run_cli_async;

#[derive(Args, Debug, Clone)]
pub struct ProductArgs {
    #[arg(value_name = "SLUG", help = "Product slug, as in /products/<SLUG>")]
    pub slug: String,

    #[arg(long, help = "Print the product as JSON")]
    pub json: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn run(args: ProductArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: ProductArgs) -> Result<(), String> {
    let (_, client) = args.common.cms_client()?;
    let product = client
        .fetch_product(&args.slug)
        .await
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("No product with slug \"{}\".", args.slug.trim()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&product)
            .map_err(|err| format!("Failed to serialize product: {err}"))?;
        println!("{json}");
    } else {
        print!("{}", format_product(&product));
    }
    Ok(())
}
