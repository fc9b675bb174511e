use clap::{Parser, Subcommand};

pub mod inspect;
pub mod run;

#[derive(Clone, Debug, Parser)]
#[command(name = "unzipper", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "r", name = "run", about = "Start the bot and process incoming archives")]
    Run(run::RunArg),
    #[command(alias = "i", name = "inspect", about = "Analyze a local archive without sending anything")]
    Inspect(inspect::InspectArg),
}
