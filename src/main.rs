mod cli;
mod error;
mod log;
mod maven;
mod pom;
mod repository;
mod updater;
mod utils;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;
use workflow::RunMode;

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::UseReleases {
            options,
            no_backup,
            dry_run,
        } => workflow::execute_use_releases(
            &cli.path,
            options,
            RunMode {
                dry_run: *dry_run,
                backup: !no_backup,
                verbose: cli.verbose,
            },
        ),
        Commands::Check { options } => workflow::execute_check(&cli.path, options, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
