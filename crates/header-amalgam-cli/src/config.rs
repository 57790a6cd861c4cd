use std::path::Path;

use anyhow::{Context, Result};
use header_amalgam_core::AmalgamConfig;
use header_amalgam_release::ReleaseConfig;
use serde::Deserialize;

/// Contents of the `--config` file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    pub amalgam: AmalgamConfig,
    pub release: ReleaseConfig,
}

impl ToolConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.amalgam.validate()?;
        Ok(config)
    }
}
