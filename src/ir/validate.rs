//! Construction-time checks for a [`Makefile`].
//!
//! Rendering accepts any graph. These checks catch the mistakes that would
//! otherwise only show up when `make` runs the generated file: foreign
//! handles, recipes that are silently dropped because their target is never
//! listed, and dependency loops.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use super::{Dependency, Makefile, MakefileError};

impl Makefile {
    /// Check the graph for problems the renderer would not report.
    ///
    /// # Errors
    ///
    /// Returns the first [`MakefileError`] found, checking foreign handles,
    /// then unlisted recipes, then cycles.
    pub fn validate(&self) -> Result<(), MakefileError> {
        self.check_handles()?;
        self.check_unlisted_recipes()?;
        if let Some(cycle) = find_cycle(&self.rule_edges()) {
            return Err(MakefileError::CircularDependency { cycle });
        }
        Ok(())
    }

    fn check_handles(&self) -> Result<(), MakefileError> {
        let len = self.arena().len();
        if let Some(id) = self.listed_ids().iter().find(|id| id.index() >= len) {
            return Err(MakefileError::UnknownTarget {
                index: id.index(),
                referrer: String::from("targets"),
            });
        }
        for target in self.arena() {
            for dep in &target.dependencies {
                if let Dependency::Target(id) = dep
                    && id.index() >= len
                {
                    return Err(MakefileError::UnknownTarget {
                        index: id.index(),
                        referrer: target.name.clone(),
                    });
                }
            }
        }
        if let Some(Dependency::Target(id)) = self.default_target()
            && id.index() >= len
        {
            return Err(MakefileError::UnknownTarget {
                index: id.index(),
                referrer: String::from(".DEFAULT_GOAL"),
            });
        }
        Ok(())
    }

    fn check_unlisted_recipes(&self) -> Result<(), MakefileError> {
        let listed: HashSet<usize> = self.listed_ids().iter().map(|id| id.index()).collect();
        let mut names: Vec<String> = self
            .arena()
            .iter()
            .enumerate()
            .filter(|(idx, target)| !listed.contains(idx) && target.has_recipe())
            .map(|(_, target)| target.name.clone())
            .collect();
        if names.is_empty() {
            return Ok(());
        }
        names.sort();
        names.dedup();
        Err(MakefileError::UnlistedRecipes { names })
    }

    /// Prerequisite names per rule name, merged across double-colon entries.
    fn rule_edges(&self) -> IndexMap<&str, Vec<&str>> {
        let mut edges: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for target in self.targets() {
            let deps = edges.entry(target.name.as_str()).or_default();
            deps.extend(target.dependencies.iter().filter_map(|d| self.resolve(d)));
        }
        edges
    }
}

/// Tracks the visitation state of a node during cycle detection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum VisitState {
    Visiting,
    Visited,
}

fn find_cycle(edges: &IndexMap<&str, Vec<&str>>) -> Option<Vec<String>> {
    let mut detector = CycleDetector::new(edges);
    for node in edges.keys() {
        if detector.is_visited(node) {
            continue;
        }
        if let Some(found) = detector.visit(*node) {
            return Some(canonicalize_cycle(found));
        }
    }
    None
}

struct CycleDetector<'a> {
    edges: &'a IndexMap<&'a str, Vec<&'a str>>,
    stack: Vec<&'a str>,
    states: HashMap<&'a str, VisitState>,
}

impl<'a> CycleDetector<'a> {
    fn new(edges: &'a IndexMap<&'a str, Vec<&'a str>>) -> Self {
        Self {
            edges,
            stack: Vec::new(),
            states: HashMap::new(),
        }
    }

    fn is_visited(&self, node: &str) -> bool {
        matches!(self.states.get(node), Some(VisitState::Visited))
    }

    fn visit(&mut self, node: &'a str) -> Option<Vec<String>> {
        match self.states.get(node) {
            Some(VisitState::Visited) => return None,
            Some(VisitState::Visiting) => {
                let idx = self.stack.iter().position(|n| *n == node).unwrap_or(0);
                let mut cycle: Vec<String> = self
                    .stack
                    .iter()
                    .skip(idx)
                    .map(|n| (*n).to_owned())
                    .collect();
                cycle.push(node.to_owned());
                return Some(cycle);
            }
            None => {
                self.states.insert(node, VisitState::Visiting);
            }
        }

        self.stack.push(node);

        let edges = self.edges;
        if let Some(deps) = edges.get(node) {
            for dep in deps {
                if !self.edges.contains_key(dep) {
                    tracing::debug!(
                        prerequisite = %dep,
                        dependent = %node,
                        "prerequisite has no rule; treating it as a file",
                    );
                    continue;
                }
                if let Some(cycle) = self.visit(*dep) {
                    return Some(cycle);
                }
            }
        }

        self.stack.pop();
        self.states.insert(node, VisitState::Visited);
        None
    }
}

fn canonicalize_cycle(mut cycle: Vec<String>) -> Vec<String> {
    if cycle.len() < 2 {
        return cycle;
    }
    let len = cycle.len() - 1;
    let start = cycle
        .iter()
        .take(len)
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map_or(0, |(idx, _)| idx);
    let (prefix, suffix) = cycle.split_at_mut(len);
    prefix.rotate_left(start);
    if let (Some(first), Some(slot)) = (prefix.first().cloned(), suffix.first_mut()) {
        *slot = first;
    }
    cycle
}
