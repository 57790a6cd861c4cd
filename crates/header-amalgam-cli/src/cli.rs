use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::amalgamate::AmalgamateArgs;
use crate::order::OrderArgs;
use crate::release::ReleaseArgs;

#[derive(Parser, Debug)]
#[command(name = "header-amalgam")]
#[command(about = "Merge a tree of interdependent headers into a single header", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// TOML file with optional [amalgam] and [release] tables
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Amalgamate all headers into a single library header
    Amalgamate(AmalgamateArgs),

    /// Stage and archive a versioned release
    Release(ReleaseArgs),

    /// Print the resolved header order and external includes
    Order(OrderArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_amalgamate_defaults() {
        let cli = Cli::try_parse_from(["header-amalgam", "amalgamate"]).unwrap();
        let Commands::Amalgamate(args) = cli.command else {
            panic!("expected amalgamate");
        };
        assert_eq!(args.header_dir, PathBuf::from("./include/CLArgs"));
        assert_eq!(args.license, PathBuf::from("./LICENSE"));
        assert_eq!(args.output_file, PathBuf::from("./clargs.hpp"));
        assert!(!args.force);
        assert!(args.version.is_none());
    }

    #[test]
    fn test_release_requires_version() {
        assert!(Cli::try_parse_from(["header-amalgam", "release"]).is_err());

        let cli = Cli::try_parse_from(["header-amalgam", "-v", "release", "--version", "1.0.0", "-f"])
            .unwrap();
        assert!(cli.verbose);
        let Commands::Release(args) = cli.command else {
            panic!("expected release");
        };
        assert_eq!(args.version, "1.0.0");
        assert!(args.force);
    }
}
