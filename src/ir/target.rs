//! Build targets and their dependency references.

use super::variable::{Conditional, Variable, VariableTable};

/// Handle to a [`Target`] stored in a [`Makefile`](super::Makefile) arena.
///
/// Handles are only minted by the arena that owns the target, so sharing a
/// handle between several dependents shares one target definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub(super) usize);

impl TargetId {
    /// Position of the target inside its arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A prerequisite of a target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dependency {
    /// A literal prerequisite: a file path, a `$(VAR)` reference or the name
    /// of a target defined elsewhere.
    Name(String),
    /// Another target in the same arena; resolved to its name when rendered.
    Target(TargetId),
}

impl From<&str> for Dependency {
    fn from(value: &str) -> Self {
        Self::Name(value.to_owned())
    }
}

impl From<String> for Dependency {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<TargetId> for Dependency {
    fn from(value: TargetId) -> Self {
        Self::Target(value)
    }
}

impl From<&TargetId> for Dependency {
    fn from(value: &TargetId) -> Self {
        Self::Target(*value)
    }
}

/// One command group of a recipe.
///
/// Separate groups run in separate shells. Steps inside a [`Command::Chain`]
/// share one shell, so a `cd` in an early step applies to the later ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A single recipe line.
    Line(String),
    /// Steps joined with `&&` and continued across lines.
    Chain(Vec<String>),
    /// Command groups guarded by conditional directives.
    Conditional(Conditional<Command>),
}

impl From<&str> for Command {
    fn from(value: &str) -> Self {
        Self::Line(value.to_owned())
    }
}

impl From<String> for Command {
    fn from(value: String) -> Self {
        Self::Line(value)
    }
}

impl From<Vec<String>> for Command {
    fn from(value: Vec<String>) -> Self {
        Self::Chain(value)
    }
}

impl From<Conditional<Command>> for Command {
    fn from(value: Conditional<Command>) -> Self {
        Self::Conditional(value)
    }
}

/// A single rule in the generated Makefile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Target {
    /// Rule name; a file path unless the target is phony.
    pub name: String,
    /// Prerequisites in declaration order.
    pub dependencies: Vec<Dependency>,
    /// Target-specific variable overrides.
    pub variables: VariableTable,
    /// Recipe command groups.
    pub commands: Vec<Command>,
    /// List the target under `.PHONY`.
    pub phony: bool,
    /// Append `@touch $@` to the recipe so the target acts as a sentinel file.
    pub auto_touch: bool,
}

impl Target {
    /// Create a target with no prerequisites or recipe.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Mark the target as phony.
    #[must_use]
    pub const fn phony(mut self) -> Self {
        self.phony = true;
        self
    }

    /// Touch the target file once the recipe completes.
    #[must_use]
    pub const fn auto_touch(mut self) -> Self {
        self.auto_touch = true;
        self
    }

    /// Add one prerequisite.
    #[must_use]
    pub fn depends_on(mut self, dependency: impl Into<Dependency>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    /// Add several prerequisites in order.
    #[must_use]
    pub fn depends_on_all<I, D>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Dependency>,
    {
        self.dependencies
            .extend(dependencies.into_iter().map(Into::into));
        self
    }

    /// Add a target-specific variable.
    #[must_use]
    pub fn variable(mut self, name: impl Into<String>, value: impl Into<Variable>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Append one command group.
    #[must_use]
    pub fn command(mut self, command: impl Into<Command>) -> Self {
        self.commands.push(command.into());
        self
    }

    /// Append several single-line command groups.
    #[must_use]
    pub fn commands<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands
            .extend(lines.into_iter().map(|line| Command::Line(line.into())));
        self
    }

    /// Append a chained group whose steps share one shell.
    #[must_use]
    pub fn chain<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands
            .push(Command::Chain(steps.into_iter().map(Into::into).collect()));
        self
    }

    /// Whether rendering this target emits any recipe lines.
    #[must_use]
    pub fn has_recipe(&self) -> bool {
        self.auto_touch || !self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_in_order() {
        let target = Target::new("build")
            .phony()
            .depends_on("a")
            .depends_on_all(["b", "c"])
            .command("echo hi")
            .chain(["cd x", "go build"]);
        assert_eq!(
            target.dependencies,
            vec![
                Dependency::from("a"),
                Dependency::from("b"),
                Dependency::from("c"),
            ]
        );
        assert_eq!(
            target.commands,
            vec![
                Command::Line("echo hi".into()),
                Command::Chain(vec!["cd x".into(), "go build".into()]),
            ]
        );
        assert!(target.phony);
        assert!(target.has_recipe());
    }

    #[test]
    fn alias_target_has_no_recipe() {
        assert!(!Target::new("all").depends_on("build").has_recipe());
        assert!(Target::new("stamp").auto_touch().has_recipe());
    }
}
