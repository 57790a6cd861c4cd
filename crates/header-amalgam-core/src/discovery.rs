//! Unit discovery
//!
//! Walks a header tree and records every unit file by base name. The walk is
//! sorted by file name at each directory level so the recorded sequence, which
//! later breaks ties in the resolver, does not depend on the platform's
//! directory enumeration order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use crate::config::{AmalgamConfig, DuplicatePolicy};
use crate::error::{AmalgamError, Result};

/// Where a unit lives on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitLocation {
    pub name: String,
    pub path: PathBuf,
}

/// Unit names mapped to locations, in discovery order
#[derive(Debug, Clone, Default)]
pub struct UnitIndex {
    entries: Vec<UnitLocation>,
    positions: HashMap<String, usize>,
}

impl UnitIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recursively collect every unit file below `root`
    #[instrument(skip(config), fields(extension = %config.extension))]
    pub fn discover(root: &Path, config: &AmalgamConfig) -> Result<Self> {
        if !root.exists() {
            return Err(AmalgamError::NotFound(root.to_path_buf()));
        }

        debug!("Discovering units in '{}'", root.display());
        let mut index = Self::new();

        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() || !config.is_unit_file(entry.path()) {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            debug!(" - {}", name);
            index.insert(name, entry.into_path(), config.duplicate_units)?;
        }

        Ok(index)
    }

    /// Record a unit, applying `policy` when the name is already known
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        policy: DuplicatePolicy,
    ) -> Result<()> {
        let name = name.into();
        let path = path.into();

        if let Some(&position) = self.positions.get(&name) {
            let existing = &mut self.entries[position];
            return match policy {
                DuplicatePolicy::Error => Err(AmalgamError::DuplicateUnit {
                    name,
                    first: existing.path.clone(),
                    second: path,
                }),
                DuplicatePolicy::LastWins => {
                    warn!(
                        "Unit '{}' at '{}' replaces '{}'",
                        name,
                        path.display(),
                        existing.path.display()
                    );
                    existing.path = path;
                    Ok(())
                }
            };
        }

        self.positions.insert(name.clone(), self.entries.len());
        self.entries.push(UnitLocation { name, path });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.positions
            .get(name)
            .map(|&position| self.entries[position].path.as_path())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitLocation> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }
}

/// A unit's identity and raw lines, immutable once read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub name: String,
    pub path: PathBuf,
    pub lines: Vec<String>,
}

impl Unit {
    pub fn from_text(name: impl Into<String>, path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn read(location: &UnitLocation) -> Result<Self> {
        let text = std::fs::read_to_string(&location.path)
            .map_err(|e| AmalgamError::io(&location.path, e))?;
        Ok(Self::from_text(&location.name, &location.path, &text))
    }
}

/// Every unit of one run, in discovery order
#[derive(Debug, Clone, Default)]
pub struct UnitSet {
    units: Vec<Unit>,
    positions: HashMap<String, usize>,
}

impl UnitSet {
    /// Read every indexed unit
    pub fn load(index: &UnitIndex) -> Result<Self> {
        let units = index.iter().map(Unit::read).collect::<Result<Vec<_>>>()?;
        Self::from_units(units)
    }

    /// Build a set from already-read units, keeping their order
    pub fn from_units(units: Vec<Unit>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(units.len());
        for (position, unit) in units.iter().enumerate() {
            if let Some(&first) = positions.get(&unit.name) {
                let first: &Unit = &units[first];
                return Err(AmalgamError::DuplicateUnit {
                    name: unit.name.clone(),
                    first: first.path.clone(),
                    second: unit.path.clone(),
                });
            }
            positions.insert(unit.name.clone(), position);
        }
        Ok(Self { units, positions })
    }

    pub fn get(&self, name: &str) -> Option<&Unit> {
        self.positions.get(name).map(|&position| &self.units[position])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }
}
