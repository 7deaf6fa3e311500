//! implreg CLI - work with implementor fragments in generated documentation

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use implreg::ops::FragmentLoadError;
use implreg::util::diagnostic;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli, color) {
        match e.downcast_ref::<FragmentLoadError>() {
            Some(load) => diagnostic::emit(&load.to_diagnostic(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("implreg=debug")
    } else {
        EnvFilter::new("implreg=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Render(args) => commands::render::execute(args),
        Commands::Inspect(args) => commands::inspect::execute(args),
        Commands::Merge(args) => commands::merge::execute(args),
        Commands::Replay(args) => commands::replay::execute(args),
        Commands::Scan(args) => commands::scan::execute(args, color),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
