use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod commands;

use args::{Cli, Command};

fn main() {
    // Load .env before parsing so KEYSCOUT_* variables feed clap
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(&cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = commands::load_config(cli.config.as_deref())?;
    let config = config.as_ref();

    match &cli.command {
        Command::Profile(args) => commands::profile::run(args, config),
        Command::Detect(args) => commands::detect::run(args, config),
        Command::Graph(args) => commands::graph::run(args, config),
        Command::History(args) => commands::history::run(args, config),
        Command::Edit(args) => commands::edit::run(args, config),
    }
}
