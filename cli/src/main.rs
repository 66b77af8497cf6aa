use clap::Parser;

mod app;
mod commands;
mod logging;

use commands::cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cli::Args::parse();
    let exit = app::run_app(args).await;
    std::process::exit(exit);
}
