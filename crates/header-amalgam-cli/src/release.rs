use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use header_amalgam_core::Amalgamator;
use header_amalgam_release::{Release, ReleaseBuilder, ReleaseRequest, ReleaseVersion};

use crate::config::ToolConfig;

#[derive(Args, Debug, Clone)]
pub struct ReleaseArgs {
    /// Release version, e.g. 1.2.0
    #[arg(long)]
    pub version: String,

    /// Directory containing the header units
    #[arg(long, default_value = "./include/CLArgs")]
    pub header_dir: PathBuf,

    #[arg(long, default_value = "./LICENSE")]
    pub license: PathBuf,

    #[arg(long, default_value = "./README.md")]
    pub readme: PathBuf,

    /// Directory receiving the staging directory and the archive
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Replace an existing release of the same version
    #[arg(short, long)]
    pub force: bool,
}

pub fn run(args: &ReleaseArgs, config: &ToolConfig) -> Result<Release> {
    let version = ReleaseVersion::parse(&args.version)?;

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create directory '{}'", args.output_dir.display()))?;

    let request = ReleaseRequest {
        version,
        header_dir: args.header_dir.clone(),
        license: args.license.clone(),
        readme: args.readme.clone(),
        output_dir: args.output_dir.clone(),
        force: args.force,
    };
    let builder = ReleaseBuilder::new(
        Amalgamator::new(config.amalgam.clone())?,
        config.release.clone(),
    );
    Ok(builder.build(&request)?)
}
