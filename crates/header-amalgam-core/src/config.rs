//! Amalgamation settings
//!
//! The conventions a header tree follows (include namespace, guard prefix,
//! unit extension) are plain values rather than constants so the same pipeline
//! serves any library laid out as `include/<Namespace>/*.<ext>`. Values can be
//! loaded from the `[amalgam]` table of a TOML file; missing keys fall back to
//! the defaults below.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AmalgamError, Result};

pub const DEFAULT_BANNER: &str = r#"          _____ _      ___
         /  __ \ |    / _ \
         | /  \/ |   / /_\ \_ __ __ _ ___
         | |   | |   |  _  | '__/ _` / __|
         | \__/\ |___| | | | | | (_| \__ \
          \____|_____|_| |_/_|  \__, |___/
                                 __/ |
                                |___/

                              Command-line argument parser"#;

/// What to do when two units in different directories share a file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Fail with [`AmalgamError::DuplicateUnit`]
    #[default]
    Error,
    /// Keep the discovery position of the first file but read the last one
    LastWins,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AmalgamConfig {
    /// Directory prefix of internal includes, e.g. `CLArgs` in `#include <CLArgs/core.hpp>`
    pub namespace: String,

    /// Leading component of every guard symbol, e.g. `CLARGS`
    pub guard_prefix: String,

    /// Unit file extension without the dot
    pub extension: String,

    /// Banner placed at the top of the metadata comment
    pub banner: String,

    pub duplicate_units: DuplicatePolicy,
}

impl Default for AmalgamConfig {
    fn default() -> Self {
        Self {
            namespace: "CLArgs".to_string(),
            guard_prefix: "CLARGS".to_string(),
            extension: "hpp".to_string(),
            banner: DEFAULT_BANNER.to_string(),
            duplicate_units: DuplicatePolicy::Error,
        }
    }
}

impl AmalgamConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AmalgamError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AmalgamError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.namespace.is_empty() {
            return Err(AmalgamError::Config("namespace must not be empty".into()));
        }
        if self.extension.is_empty() || !self.extension.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(AmalgamError::Config(format!(
                "extension '{}' must be non-empty and alphanumeric",
                self.extension
            )));
        }
        if self.guard_prefix.is_empty()
            || !self
                .guard_prefix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(AmalgamError::Config(format!(
                "guard_prefix '{}' must match [A-Z0-9_]+",
                self.guard_prefix
            )));
        }
        Ok(())
    }

    /// Uppercased extension used as the trailing guard component
    pub fn guard_suffix(&self) -> String {
        self.extension.to_ascii_uppercase()
    }

    pub fn is_unit_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.extension)
    }
}

impl FromStr for AmalgamConfig {
    type Err = AmalgamError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
