//! `yx` binary entry point.

#[tokio::main]
async fn main() {
    yx_core::init_tracing();

    let code = yx_cli::run(std::env::args().collect()).await;
    std::process::exit(code);
}
