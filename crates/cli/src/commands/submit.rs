use clap::{Args, Subcommand};
use console::style;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use yx_core::content::forms::{CustomRequest, SampleRequest};

use super::CommonArgs;
use crate::run_cli_async;

#[derive(Subcommand, Debug, Clone)]
pub enum SubmitCommands {
    /// Request product samples
    Sample(SubmitArgs),
    /// Request a custom build
    Custom(SubmitArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    #[arg(value_name = "FILE", help = "JSON file holding the form fields")]
    pub file: PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn run(command: SubmitCommands) -> i32 {
    run_cli_async(|| run_inner(command)).await
}

async fn run_inner(command: SubmitCommands) -> Result<(), String> {
    match command {
        SubmitCommands::Sample(args) => {
            let request: SampleRequest = read_form(&args.file)?;
            let (_, client) = args.common.cms_client()?;
            client
                .submit_sample_request(&request)
                .await
                .map_err(|err| err.to_string())?;
        }
        SubmitCommands::Custom(args) => {
            let request: CustomRequest = read_form(&args.file)?;
            let (_, client) = args.common.cms_client()?;
            client
                .submit_custom_request(&request)
                .await
                .map_err(|err| err.to_string())?;
        }
    }
    println!("{} Request submitted.", style("✓").green());
    Ok(())
}

fn read_form<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {}: {err}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|err| format!("Invalid form in {}: {err}", path.display()))
}
