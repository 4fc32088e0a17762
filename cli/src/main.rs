mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{layers, refresh};
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter from the -v count; RUST_LOG takes precedence.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("swiss_admin={level}")));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!(?cli, "parsed arguments");

    match &cli.command {
        Commands::Refresh(args) => refresh::run(&cli, args),
        Commands::Layers(args) => layers::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
