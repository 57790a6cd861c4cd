//! Dependency extraction
//!
//! Include lines come in two forms. `#include <Namespace/name.ext>` names
//! another unit; any other `#include <...>` names something outside the unit
//! set. [`IncludeMatcher`] checks the internal form first and returns a tagged
//! result, and the same classification drives both extraction here and line
//! stripping in [`crate::transform`].

use std::collections::{BTreeSet, HashMap};

use regex::Regex;
use tracing::{debug, instrument};

use crate::config::AmalgamConfig;
use crate::discovery::UnitSet;
use crate::error::Result;

/// Classification of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeLine<'a> {
    /// `#include <Namespace/name.ext>`, carrying `name.ext`
    Internal(&'a str),
    /// Any other bracketed include, carrying the bracketed text
    External(&'a str),
    Other,
}

impl IncludeLine<'_> {
    pub fn is_include(&self) -> bool {
        !matches!(self, IncludeLine::Other)
    }
}

#[derive(Debug, Clone)]
pub struct IncludeMatcher {
    namespace: String,
    internal: Regex,
    external: Regex,
}

impl IncludeMatcher {
    pub fn new(config: &AmalgamConfig) -> Result<Self> {
        let internal = Regex::new(&format!(
            r"^\s*#\s*include\s*<{}/(\w+\.{})>",
            regex::escape(&config.namespace),
            regex::escape(&config.extension)
        ))?;
        let external = Regex::new(r"^\s*#\s*include\s*<([^>]+)>")?;

        Ok(Self {
            namespace: config.namespace.clone(),
            internal,
            external,
        })
    }

    pub fn classify<'a>(&self, line: &'a str) -> IncludeLine<'a> {
        if let Some(name) = self.internal.captures(line).and_then(|c| c.get(1)) {
            return IncludeLine::Internal(name.as_str());
        }
        if let Some(name) = self.external.captures(line).and_then(|c| c.get(1)) {
            return IncludeLine::External(name.as_str());
        }
        IncludeLine::Other
    }

    /// External spelling of an internal include whose target is not a known unit
    fn qualified(&self, name: &str) -> String {
        format!("{}/{}", self.namespace, name)
    }
}

/// Dependencies declared across a unit set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    /// unit -> units it includes
    internal: HashMap<String, BTreeSet<String>>,
    /// Every reference outside the unit set, sorted
    pub external: BTreeSet<String>,
}

impl Dependencies {
    /// Scan every unit of `units`
    #[instrument(skip_all, fields(units = units.len()))]
    pub fn extract(units: &UnitSet, matcher: &IncludeMatcher) -> Self {
        let mut deps = Self::default();

        for unit in units.iter() {
            debug!("Discovering dependencies for unit '{}':", unit.name);
            let targets = deps.internal.entry(unit.name.clone()).or_default();

            for line in &unit.lines {
                match matcher.classify(line) {
                    IncludeLine::Internal(name) if units.contains(name) => {
                        debug!(" - {} (internal)", name);
                        targets.insert(name.to_string());
                    }
                    IncludeLine::Internal(name) => {
                        let qualified = matcher.qualified(name);
                        debug!(" - {} (unknown unit, treated as external)", qualified);
                        deps.external.insert(qualified);
                    }
                    IncludeLine::External(name) => {
                        debug!(" - {} (external)", name);
                        deps.external.insert(name.to_string());
                    }
                    IncludeLine::Other => {}
                }
            }
        }

        deps
    }

    /// Units `unit` includes directly
    pub fn dependencies_of(&self, unit: &str) -> impl Iterator<Item = &str> {
        self.internal
            .get(unit)
            .into_iter()
            .flat_map(|targets| targets.iter().map(String::as_str))
    }

    pub fn edge_count(&self) -> usize {
        self.internal.values().map(BTreeSet::len).sum()
    }
}
