//! csforge CLI - compile a single C# source file into a Windows executable

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod render;

use cli::{Cli, Commands};
use csforge::util::shell::{ColorChoice, Shell};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("csforge=debug")
    } else {
        EnvFilter::new("csforge=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let color: ColorChoice = cli
        .color
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let json = match cli.message_format.as_str() {
        "human" => false,
        "json" => true,
        other => anyhow::bail!(
            "invalid message format '{}'; expected 'human' or 'json'",
            other
        ),
    };
    let shell = Shell::from_flags(cli.quiet, cli.verbose, color, json);

    // Execute command
    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &shell),
        Commands::Doctor => commands::doctor::execute(cli.verbose),
        Commands::Install(args) => commands::install::execute(args, &shell),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
