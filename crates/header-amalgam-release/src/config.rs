use serde::{Deserialize, Serialize};

/// Naming of the staged release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseConfig {
    /// Project name used for the staging directory, archive and CMake target
    pub project: String,

    /// File name of the amalgamated header inside `include/<namespace>/`
    pub artifact_name: String,

    pub cmake_minimum_version: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            project: "CLArgs".to_string(),
            artifact_name: "clargs.hpp".to_string(),
            cmake_minimum_version: "3.20".to_string(),
        }
    }
}
