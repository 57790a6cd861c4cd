use std::path::PathBuf;

use header_amalgam_core::AmalgamError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid version format: '{0}'. Must match pattern '[0-9]+.[0-9]+.[0-9]+'")]
    InvalidVersion(String),

    #[error("Required file not found: '{}'", .0.display())]
    MissingFile(PathBuf),

    #[error("'{}' already exists, use --force to replace it", .0.display())]
    AlreadyExists(PathBuf),

    #[error(transparent)]
    Amalgam(#[from] AmalgamError),

    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl ReleaseError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ReleaseError> = std::result::Result<T, E>;
