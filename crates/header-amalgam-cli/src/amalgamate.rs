use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use header_amalgam_core::{AmalgamOptions, AmalgamSummary, Amalgamator};
use tracing::{debug, info};

use crate::config::ToolConfig;

#[derive(Args, Debug, Clone)]
pub struct AmalgamateArgs {
    /// Directory containing the header units
    #[arg(long, default_value = "./include/CLArgs")]
    pub header_dir: PathBuf,

    /// License file embedded in the metadata block
    #[arg(long, default_value = "./LICENSE")]
    pub license: PathBuf,

    /// Path of the amalgamated header
    #[arg(long, default_value = "./clargs.hpp")]
    pub output_file: PathBuf,

    /// Version string embedded in the metadata block
    #[arg(long)]
    pub version: Option<String>,

    /// Overwrite the output file without asking
    #[arg(short, long)]
    pub force: bool,

    /// Leave out the "generated file" warning
    #[arg(long)]
    pub no_generated_file_warning: bool,

    /// Leave out the generation timestamp
    #[arg(long)]
    pub omit_timestamp: bool,
}

impl AmalgamateArgs {
    pub fn options(&self) -> AmalgamOptions {
        AmalgamOptions {
            warning: !self.no_generated_file_warning,
            timestamp: !self.omit_timestamp,
            version: self.version.clone(),
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Written(AmalgamSummary),
    /// The user refused to overwrite an existing output file
    Declined,
}

/// Run the amalgamation, asking `confirm` before replacing an existing file
pub fn run(
    args: &AmalgamateArgs,
    config: &ToolConfig,
    confirm: impl FnOnce(&Path) -> io::Result<bool>,
) -> Result<Outcome> {
    if args.output_file.exists() && !args.force {
        let agreed = confirm(&args.output_file).context("Failed to read confirmation")?;
        if !agreed {
            info!("Keeping existing file '{}'", args.output_file.display());
            return Ok(Outcome::Declined);
        }
    }

    if let Some(parent) = args.output_file.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating output directory '{}'", parent.display());
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
        }
    }

    if !args.license.is_file() {
        bail!("License file '{}' does not exist", args.license.display());
    }
    if !args.header_dir.is_dir() {
        bail!("Directory '{}' does not exist", args.header_dir.display());
    }

    let license = fs::read_to_string(&args.license)
        .with_context(|| format!("Failed to read '{}'", args.license.display()))?;

    let amalgamator = Amalgamator::new(config.amalgam.clone())?;
    let summary = amalgamator.run(&args.header_dir, &license, &args.output_file, &args.options())?;
    Ok(Outcome::Written(summary))
}
