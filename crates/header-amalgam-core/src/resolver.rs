//! Dependency graph and topological ordering of units

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use tracing::{debug, instrument};

use crate::discovery::UnitSet;
use crate::error::{AmalgamError, Result};
use crate::extractor::Dependencies;

/// Directed graph of units; an edge `a -> b` means `a` includes `b`.
///
/// Node indices follow insertion order, which callers keep equal to discovery
/// order so that ties in [`DependencyGraph::resolve_order`] are reproducible.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    nodes: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a unit set and its extracted dependencies
    pub fn from_units(units: &UnitSet, deps: &Dependencies) -> Self {
        let mut graph = Self::new();
        for unit in units.iter() {
            graph.add_unit(&unit.name);
        }
        for unit in units.iter() {
            for target in deps.dependencies_of(&unit.name) {
                graph.add_dependency(&unit.name, target);
            }
        }
        graph
    }

    /// Add a unit; adding a known unit is a no-op
    pub fn add_unit(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.nodes.insert(name.to_string(), idx);
        idx
    }

    /// Record that `from` depends on `to`
    pub fn add_dependency(&mut self, from: &str, to: &str) {
        let from = self.add_unit(from);
        let to = self.add_unit(to);
        self.graph.update_edge(from, to, ());
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Direct dependencies of `idx`, lowest index first
    fn dependencies(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut deps: Vec<_> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        deps.sort_unstable();
        deps.dedup();
        deps
    }

    /// Order units so every unit follows the units it depends on.
    ///
    /// Kahn's algorithm over "is included by" counts: units nothing includes
    /// are peeled first, in insertion order, and each peeled unit releases its
    /// dependencies in insertion order. That yields dependents first, so the
    /// sequence is reversed at the end.
    #[instrument(skip(self), fields(units = self.len()))]
    pub fn resolve_order(&self) -> Result<Vec<String>> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .collect::<HashSet<_>>()
                    .len()
            })
            .collect();

        let mut queue: VecDeque<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|idx| in_degree[idx.index()] == 0)
            .collect();
        let mut ordered = Vec::with_capacity(self.len());

        while let Some(idx) = queue.pop_front() {
            debug!(" - {}", self.graph[idx]);
            ordered.push(idx);

            for dep in self.dependencies(idx) {
                let degree = &mut in_degree[dep.index()];
                *degree = degree.saturating_sub(1);
                if *degree == 0 {
                    queue.push_back(dep);
                }
            }
        }

        if ordered.len() != self.len() {
            let placed: HashSet<_> = ordered.into_iter().collect();
            return Err(AmalgamError::CyclicDependency {
                cycle: self.find_cycle(&placed),
            });
        }
        debug!("No circular dependencies detected");

        ordered.reverse();
        Ok(ordered
            .into_iter()
            .map(|idx| self.graph[idx].clone())
            .collect())
    }

    /// Find a concrete cycle among the units Kahn's algorithm could not place.
    /// The returned path repeats its first unit at the end.
    fn find_cycle(&self, placed: &HashSet<NodeIndex>) -> Vec<String> {
        let mut visited = HashSet::new();
        let mut on_stack = HashSet::new();
        let mut path = Vec::new();

        for idx in self.graph.node_indices() {
            if placed.contains(&idx) || visited.contains(&idx) {
                continue;
            }
            if let Some(cycle) =
                self.find_cycle_dfs(idx, placed, &mut visited, &mut on_stack, &mut path)
            {
                return cycle;
            }
        }

        // Unreachable when Kahn's algorithm stalled, but keep the error useful
        self.graph
            .node_indices()
            .filter(|idx| !placed.contains(idx))
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    fn find_cycle_dfs(
        &self,
        idx: NodeIndex,
        placed: &HashSet<NodeIndex>,
        visited: &mut HashSet<NodeIndex>,
        on_stack: &mut HashSet<NodeIndex>,
        path: &mut Vec<NodeIndex>,
    ) -> Option<Vec<String>> {
        visited.insert(idx);
        on_stack.insert(idx);
        path.push(idx);

        for dep in self.dependencies(idx) {
            if placed.contains(&dep) {
                continue;
            }
            if on_stack.contains(&dep) {
                if let Some(start) = path.iter().position(|&n| n == dep) {
                    let mut cycle: Vec<String> = path[start..]
                        .iter()
                        .map(|&n| self.graph[n].clone())
                        .collect();
                    cycle.push(self.graph[dep].clone());
                    return Some(cycle);
                }
            } else if !visited.contains(&dep) {
                if let Some(cycle) = self.find_cycle_dfs(dep, placed, visited, on_stack, path) {
                    return Some(cycle);
                }
            }
        }

        on_stack.remove(&idx);
        path.pop();
        None
    }
}
