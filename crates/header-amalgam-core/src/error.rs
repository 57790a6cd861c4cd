use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AmalgamError {
    #[error("Not found: '{}'", .0.display())]
    NotFound(PathBuf),

    #[error("Circular dependency detected among units: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    #[error(
        "Duplicate unit '{name}': '{}' and '{}'",
        .first.display(),
        .second.display()
    )]
    DuplicateUnit {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid line pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AmalgamError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = AmalgamError> = std::result::Result<T, E>;
