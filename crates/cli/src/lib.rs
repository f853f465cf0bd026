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

//! Command line interface for the YX site tools.

use clap::{CommandFactory, Parser, Subcommand};

pub mod commands;
pub mod output;

use commands::{categories, downloads, interactive, product, search, serve, submit};

#[derive(Parser, Debug)]
#[command(
    name = "yx",
    version,
    about = "\x1b[33myx\x1b[0m searches and serves the YX product site"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 🔍 Search products and news
    Search(search::SearchArgs),
    /// ⌨️  Search as you type, one query per line
    Interactive(interactive::InteractiveArgs),
    /// 🚀 Serve search and the /api proxy
    Serve(serve::ServeArgs),
    /// 🖥️  Show one product by slug
    Product(product::ProductArgs),
    /// 🗂️  List product categories
    Categories(categories::CategoriesArgs),
    /// 📦 List download center files
    Downloads(downloads::DownloadsArgs),
    /// 📨 Submit a lead form from a JSON file
    #[command(subcommand)]
    Submit(submit::SubmitCommands),
}

pub async fn run_cli_async<F, Fut>(f: F) -> i32
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), String>>,
{
    match f().await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// Parse `args` (including the program name) and run the command.
pub async fn run(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Search(args)) => search::run(args).await,
            Some(Commands::Interactive(args)) => interactive::run(args).await,
            Some(Commands::Serve(args)) => serve::run(args).await,
            Some(Commands::Product(args)) => product::run(args).await,
            Some(Commands::Categories(args)) => categories::run(args).await,
            Some(Commands::Downloads(args)) => downloads::run(args).await,
            Some(Commands::Submit(command)) => submit::run(command).await,
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}
