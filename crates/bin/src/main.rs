use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};

/// Log filter used when `SERIA_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "seria=info";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_env("SERIA_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli.format.into();

    match cli.command {
        Commands::Check(args) => commands::check::run(&args, format),
        Commands::Tree(args) => commands::tree::run(&args, format),
        Commands::Get(args) => commands::edit::get(&args, format),
        Commands::Set(args) => commands::edit::set(&args, format),
        Commands::Escadras(args) => commands::escadras::run(&args, format),
    }
}
