//! The amalgamation pipeline
//!
//! Discovery → extraction → resolution → transformation → assembly. Each stage
//! runs to completion before the next starts, the artifact is built entirely
//! in memory, and the output path is touched by exactly one write after every
//! stage succeeded. A failed run leaves any existing artifact as it was.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::assembler::{header_guard, ArtifactHeader, Assembler, UnitContent};
use crate::config::AmalgamConfig;
use crate::discovery::{UnitIndex, UnitSet};
use crate::error::{AmalgamError, Result};
use crate::extractor::Dependencies;
use crate::resolver::DependencyGraph;
use crate::transform::ContentTransformer;

/// Caller-controlled parts of the metadata block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmalgamOptions {
    /// Prepend the "generated file, do not edit" warning
    pub warning: bool,
    /// Embed the generation time
    pub timestamp: bool,
    /// Version string, embedded verbatim
    pub version: Option<String>,
}

/// Units of one run together with their dependencies and resolved order
#[derive(Debug)]
pub struct ResolvedUnits {
    pub units: UnitSet,
    pub dependencies: Dependencies,
    pub order: Vec<String>,
}

/// A fully rendered artifact that has not been written yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub guard: String,
    pub order: Vec<String>,
    pub external: Vec<String>,
    pub text: String,
}

/// What a successful run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmalgamSummary {
    pub path: PathBuf,
    pub order: Vec<String>,
    pub external: Vec<String>,
    pub bytes: usize,
}

#[derive(Debug, Clone)]
pub struct Amalgamator {
    config: AmalgamConfig,
    transformer: ContentTransformer,
}

impl Amalgamator {
    pub fn new(config: AmalgamConfig) -> Result<Self> {
        config.validate()?;
        let transformer = ContentTransformer::new(&config)?;
        Ok(Self {
            config,
            transformer,
        })
    }

    pub fn config(&self) -> &AmalgamConfig {
        &self.config
    }

    /// Discover, read and order every unit below `unit_root`
    #[instrument(skip(self))]
    pub fn resolve(&self, unit_root: &Path) -> Result<ResolvedUnits> {
        let index = UnitIndex::discover(unit_root, &self.config)?;
        let units = UnitSet::load(&index)?;
        let dependencies = Dependencies::extract(&units, self.transformer.matcher());

        debug!("Resolving topological ordering for units:");
        let order = DependencyGraph::from_units(&units, &dependencies).resolve_order()?;

        Ok(ResolvedUnits {
            units,
            dependencies,
            order,
        })
    }

    /// Build the artifact text for `output_name` without writing it
    #[instrument(skip(self, license, options))]
    pub fn render(
        &self,
        unit_root: &Path,
        license: &str,
        output_name: &str,
        options: &AmalgamOptions,
        generated_at: Option<DateTime<Utc>>,
    ) -> Result<Artifact> {
        let resolved = self.resolve(unit_root)?;
        let guard = header_guard(&self.config.guard_prefix, output_name);
        debug!("Opening header guard '{}'", guard);

        let mut contents = Vec::with_capacity(resolved.order.len());
        for name in &resolved.order {
            let unit = resolved
                .units
                .get(name)
                .ok_or_else(|| AmalgamError::NotFound(PathBuf::from(name)))?;
            debug!("Processing content of unit '{}'", name);
            contents.push(UnitContent {
                name: name.clone(),
                lines: self.transformer.transform(&unit.lines),
            });
        }

        let header = ArtifactHeader {
            warning: options.warning,
            version: options.version.as_deref(),
            generated_at,
            license,
        };
        let text = Assembler::new(&self.config).assemble(
            &guard,
            &header,
            &resolved.dependencies.external,
            &contents,
        );

        Ok(Artifact {
            guard,
            order: resolved.order,
            external: resolved.dependencies.external.into_iter().collect(),
            text,
        })
    }

    /// Render the artifact for `output_path` and write it in one go
    #[instrument(skip(self, license, options))]
    pub fn run(
        &self,
        unit_root: &Path,
        license: &str,
        output_path: &Path,
        options: &AmalgamOptions,
    ) -> Result<AmalgamSummary> {
        let output_name = output_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                AmalgamError::Config(format!(
                    "output path '{}' has no file name",
                    output_path.display()
                ))
            })?;

        let generated_at = options.timestamp.then(Utc::now);
        let artifact = self.render(unit_root, license, &output_name, options, generated_at)?;
        write_artifact(&artifact.text, output_path)?;
        info!(
            "Amalgamated {} units into '{}'",
            artifact.order.len(),
            output_path.display()
        );

        Ok(AmalgamSummary {
            path: output_path.to_path_buf(),
            bytes: artifact.text.len(),
            order: artifact.order,
            external: artifact.external,
        })
    }
}

/// Replace `path` with `text`
pub fn write_artifact(text: &str, path: &Path) -> Result<()> {
    debug!("Writing final result to '{}'", path.display());
    std::fs::write(path, text).map_err(|e| AmalgamError::io(path, e))
}

/// Amalgamate every unit below `unit_root` into `output_path` using the
/// default conventions.
pub fn amalgamate(
    unit_root: &Path,
    license_text: &str,
    add_warning: bool,
    output_path: &Path,
    with_timestamp: bool,
    version: Option<&str>,
) -> Result<AmalgamSummary> {
    let options = AmalgamOptions {
        warning: add_warning,
        timestamp: with_timestamp,
        version: version.map(str::to_string),
    };
    Amalgamator::new(AmalgamConfig::default())?.run(unit_root, license_text, output_path, &options)
}
