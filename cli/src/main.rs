mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{interactive, options, render};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Options => options::run(&cli),
        Commands::Render(args) => render::run(&cli, args),
        Commands::Interactive(args) => interactive::run(&cli, args),
    }
}

/// Warnings by default; each -v raises the level. RUST_LOG still wins.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> anyhow::Result<()> { run() }
