// src/main.rs

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::CookOptions;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Some(Commands::Source { recipe, dest }) => commands::cmd_source(&recipe, &dest),
        Some(Commands::Build {
            recipe,
            source,
            build_dir,
            jobs,
            settings,
        }) => commands::cmd_build(&recipe, &source, &build_dir, jobs, &settings),
        Some(Commands::Package {
            recipe,
            source,
            build_dir,
            package_root,
            clean,
            settings,
        }) => commands::cmd_package(&recipe, &source, &build_dir, &package_root, clean, &settings),
        Some(Commands::Info { recipe, json }) => commands::cmd_info(&recipe, json),
        Some(Commands::Cook {
            recipe,
            package_root,
            work_dir,
            jobs,
            keep_builddir,
            clean,
            validate_only,
            settings,
        }) => commands::cmd_cook(
            &recipe,
            CookOptions {
                package_root: &package_root,
                work_dir: work_dir.as_deref(),
                jobs,
                keep_builddir,
                clean,
                validate_only,
            },
            &settings,
        ),
        None => {
            // No command provided, show help
            println!("stockpot v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'stockpot --help' for usage information");
            Ok(())
        }
    }
}
