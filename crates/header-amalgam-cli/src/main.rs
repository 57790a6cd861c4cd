use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use header_amalgam::amalgamate::{self, Outcome};
use header_amalgam::cli::{Cli, Commands};
use header_amalgam::config::ToolConfig;
use header_amalgam::{order, prompt, release};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.debug {
        LevelFilter::TRACE
    } else if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_target(cli.debug) // Show target module in debug mode
        .with_writer(io::stderr)
        .init();
    tracing::debug!("Verbose output is enabled");

    let config = ToolConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Amalgamate(args) => {
            let outcome = amalgamate::run(&args, &config, |path| {
                prompt::confirm_overwrite(path, &mut io::stdin().lock(), &mut io::stdout())
            })?;
            if let Outcome::Written(summary) = outcome {
                println!("Successfully created file '{}'", summary.path.display());
            }
        }
        Commands::Release(args) => {
            let release = release::run(&args, &config)?;
            println!("Release package created: {}", release.archive.display());
        }
        Commands::Order(args) => {
            let report = order::run(&args, &config)?;
            print!("{}", order::render(&report, args.json)?);
        }
    }

    Ok(())
}
