//! Release staging
//!
//! A release directory `<project>-<version>/` holds the license, the readme,
//! a generated `CMakeLists.txt` exposing an INTERFACE target, and the
//! amalgamated header under `include/<namespace>/`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use header_amalgam_core::pipeline::write_artifact;
use header_amalgam_core::{AmalgamOptions, Amalgamator};
use tracing::{debug, info, instrument, warn};

use crate::archive::create_tar_gz;
use crate::config::ReleaseConfig;
use crate::error::{ReleaseError, Result};
use crate::version::ReleaseVersion;

/// Inputs of one release
#[derive(Debug, Clone)]
pub struct ReleaseRequest {
    pub version: ReleaseVersion,
    pub header_dir: PathBuf,
    pub license: PathBuf,
    pub readme: PathBuf,
    pub output_dir: PathBuf,
    /// Replace an existing staging directory and archive
    pub force: bool,
}

/// Paths produced by a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub directory: PathBuf,
    pub header: PathBuf,
    pub archive: PathBuf,
    pub archived_files: usize,
}

pub fn cmake_lists(
    config: &ReleaseConfig,
    namespace: &str,
    version: &ReleaseVersion,
) -> String {
    format!(
        "cmake_minimum_required(VERSION {cmake})

project({project} VERSION {version})

add_library({project} INTERFACE
    ${{CMAKE_CURRENT_LIST_DIR}}/include/{namespace}/{artifact}
)
target_include_directories({project} INTERFACE
    ${{CMAKE_CURRENT_LIST_DIR}}/include
)
",
        cmake = config.cmake_minimum_version,
        project = config.project,
        artifact = config.artifact_name,
    )
}

pub struct ReleaseBuilder {
    amalgamator: Amalgamator,
    config: ReleaseConfig,
}

impl ReleaseBuilder {
    pub fn new(amalgamator: Amalgamator, config: ReleaseConfig) -> Self {
        Self {
            amalgamator,
            config,
        }
    }

    fn release_name(&self, version: &ReleaseVersion) -> String {
        format!("{}-{}", self.config.project, version)
    }

    pub fn release_dir(&self, request: &ReleaseRequest) -> PathBuf {
        request.output_dir.join(self.release_name(&request.version))
    }

    pub fn archive_path(&self, request: &ReleaseRequest) -> PathBuf {
        request
            .output_dir
            .join(format!("{}.tar.gz", self.release_name(&request.version)))
    }

    /// Stage the release directory and return the path of the amalgamated header.
    ///
    /// The header is rendered before anything is written, so a unit tree that
    /// cannot be amalgamated leaves no staging directory behind.
    #[instrument(skip(self, request), fields(version = %request.version))]
    pub fn stage(&self, request: &ReleaseRequest) -> Result<PathBuf> {
        for required in [&request.license, &request.readme] {
            if !required.is_file() {
                return Err(ReleaseError::MissingFile(required.clone()));
            }
        }

        let release_dir = self.release_dir(request);
        if release_dir.exists() && !request.force {
            return Err(ReleaseError::AlreadyExists(release_dir));
        }

        let license = fs::read_to_string(&request.license)
            .map_err(|e| ReleaseError::io(&request.license, e))?;
        let options = AmalgamOptions {
            warning: false,
            timestamp: true,
            version: Some(request.version.to_string()),
        };
        let artifact = self.amalgamator.render(
            &request.header_dir,
            &license,
            &self.config.artifact_name,
            &options,
            Some(Utc::now()),
        )?;

        if release_dir.exists() {
            debug!("Removing previous release directory '{}'", release_dir.display());
            fs::remove_dir_all(&release_dir).map_err(|e| ReleaseError::io(&release_dir, e))?;
        }

        let written = self.write_release(request, &release_dir, &artifact.text);
        if written.is_err() && release_dir.exists() {
            debug!("Removing incomplete release directory '{}'", release_dir.display());
            if let Err(e) = fs::remove_dir_all(&release_dir) {
                warn!("Failed to remove '{}': {}", release_dir.display(), e);
            }
        }
        written
    }

    fn write_release(
        &self,
        request: &ReleaseRequest,
        release_dir: &Path,
        header_text: &str,
    ) -> Result<PathBuf> {
        let namespace = &self.amalgamator.config().namespace;
        let header_dir = release_dir.join("include").join(namespace);
        fs::create_dir_all(&header_dir).map_err(|e| ReleaseError::io(&header_dir, e))?;

        copy(&request.license, &release_dir.join("LICENSE"))?;
        copy(&request.readme, &release_dir.join("README.md"))?;

        let cmake_path = release_dir.join("CMakeLists.txt");
        fs::write(&cmake_path, cmake_lists(&self.config, namespace, &request.version))
            .map_err(|e| ReleaseError::io(&cmake_path, e))?;

        let header = header_dir.join(&self.config.artifact_name);
        write_artifact(header_text, &header)?;

        Ok(header)
    }

    /// Stage the release and pack it into `<project>-<version>.tar.gz`
    pub fn build(&self, request: &ReleaseRequest) -> Result<Release> {
        let archive = self.archive_path(request);
        if archive.exists() && !request.force {
            return Err(ReleaseError::AlreadyExists(archive));
        }

        let header = self.stage(request)?;
        let directory = self.release_dir(request);
        let archived_files = create_tar_gz(&directory, &archive)?;
        info!("Release package created: '{}'", archive.display());

        Ok(Release {
            directory,
            header,
            archive,
            archived_files,
        })
    }
}

fn copy(from: &Path, to: &Path) -> Result<()> {
    debug!("Copying '{}' to '{}'", from.display(), to.display());
    fs::copy(from, to).map_err(|e| ReleaseError::io(from, e))?;
    Ok(())
}
