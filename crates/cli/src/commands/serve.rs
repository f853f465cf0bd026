use clap::Args;
use yx_core::SiteConfig;

use super::CommonArgs;
use crate::run_cli_async;

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, value_name = "HOST", help = "Address to bind (default 0.0.0.0)")]
    pub host: Option<String>,

    #[arg(short, long, value_name = "PORT", help = "Port to listen on (default 8080)")]
    pub port: Option<u16>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn run(args: ServeArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: ServeArgs) -> Result<(), String> {
    let config = resolve_config(&args)?;
    yx_core::server::run_server(&config).await
}

fn resolve_config(args: &ServeArgs) -> Result<SiteConfig, String> {
    let mut config = args.common.load_config()?;
    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    Ok(config)
}
