//! The Makefile root: global variables plus an arena of targets.

use super::target::{Dependency, Target, TargetId};
use super::variable::{Variable, VariableTable};

/// A complete Makefile description ready for [`crate::make_gen::render`].
///
/// Targets live in an arena and are addressed by [`TargetId`]. Only targets
/// whose handle appears in the top-level list get a rule block; the rest are
/// referenced by name from their dependents. Use [`Makefile::insert`] for the
/// common case of adding and listing in one step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Makefile {
    variables: VariableTable,
    arena: Vec<Target>,
    targets: Vec<TargetId>,
    default_target: Option<Dependency>,
}

impl Makefile {
    /// Create an empty Makefile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace a global variable, keeping its original position when
    /// replacing.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Variable>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Global variables in insertion order.
    #[must_use]
    pub const fn variables(&self) -> &VariableTable {
        &self.variables
    }

    /// Store a target in the arena without listing it.
    pub fn add(&mut self, target: Target) -> TargetId {
        let id = TargetId(self.arena.len());
        self.arena.push(target);
        id
    }

    /// Append a handle to the top-level target list.
    pub fn list(&mut self, id: TargetId) {
        self.targets.push(id);
    }

    /// Store a target and list it.
    pub fn insert(&mut self, target: Target) -> TargetId {
        let id = self.add(target);
        self.list(id);
        id
    }

    /// Look up a target by handle.
    #[must_use]
    pub fn target(&self, id: TargetId) -> Option<&Target> {
        self.arena.get(id.0)
    }

    /// Mutable access to a target, e.g. to rename it after wiring.
    pub fn target_mut(&mut self, id: TargetId) -> Option<&mut Target> {
        self.arena.get_mut(id.0)
    }

    /// Every target in the arena, listed or not, in creation order.
    #[must_use]
    pub fn arena(&self) -> &[Target] {
        &self.arena
    }

    /// Handles of listed targets in list order.
    #[must_use]
    pub fn listed_ids(&self) -> &[TargetId] {
        &self.targets
    }

    /// Listed targets in list order. Handles from another arena are skipped.
    pub fn targets(&self) -> impl Iterator<Item = &Target> + '_ {
        self.targets.iter().filter_map(|id| self.target(*id))
    }

    /// Pick the goal `make` builds when invoked without arguments.
    pub fn set_default_target(&mut self, target: impl Into<Dependency>) {
        self.default_target = Some(target.into());
    }

    /// The configured default goal, if any.
    #[must_use]
    pub const fn default_target(&self) -> Option<&Dependency> {
        self.default_target.as_ref()
    }

    /// Resolve a dependency to the name written into the Makefile.
    ///
    /// Returns `None` for a handle that does not belong to this arena.
    #[must_use]
    pub fn resolve<'a>(&'a self, dependency: &'a Dependency) -> Option<&'a str> {
        match dependency {
            Dependency::Name(name) => Some(name.as_str()),
            Dependency::Target(id) => self.target(*id).map(|t| t.name.as_str()),
        }
    }
}
