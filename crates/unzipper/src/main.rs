use clap::Parser;

use crate::cli::{App, Commands};

mod cli;
mod config;
mod dispatcher;
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app = App::parse();
    match app.cmd {
        Commands::Run(args) => cli::run::execute(args).await,
        Commands::Inspect(args) => cli::inspect::execute(args),
    }
}
