//! Makefile text generator.
//!
//! This module converts a [`crate::ir::Makefile`] into GNU Make syntax. Output
//! follows list order exactly, so the same graph always renders the same
//! bytes. Every rule uses the double-colon form and a `.PHONY` rule covering
//! the listed phony targets is appended after all user targets.

use crate::ir::{Assignment, Command, Conditional, Dependency, Makefile, Target, Variable};
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

/// Make requires a literal tab before each recipe line.
const RECIPE_PREFIX: char = '\t';
const PHONY_TARGET: &str = ".PHONY";
const DEFAULT_GOAL: &str = ".DEFAULT_GOAL";
const TOUCH_COMMAND: &str = "@touch $@";

/// Render a Makefile as text.
///
/// The input is only read; rendering twice yields identical output.
///
/// ```
/// use provider_make::ir::{Makefile, Target};
/// use provider_make::make_gen::render;
///
/// let mut makefile = Makefile::new();
/// makefile.set_variable("V", "1");
/// makefile.insert(Target::new("t").depends_on("x").command("echo hi").phony());
/// assert_eq!(render(&makefile), "V := 1\n\nt:: x\n\techo hi\n\n.PHONY:: t\n");
/// ```
#[must_use]
pub fn render(makefile: &Makefile) -> String {
    let mut variables: Vec<String> = makefile
        .variables()
        .iter()
        .map(|(name, variable)| {
            DisplayVariable {
                scope: None,
                name,
                variable,
            }
            .to_string()
        })
        .collect();
    if let Some(goal) = makefile.default_target().and_then(|d| makefile.resolve(d)) {
        variables.push(format!("{DEFAULT_GOAL} := {goal}"));
    }

    let phony = phony_target(makefile);
    let blocks = makefile
        .targets()
        .chain(phony.as_ref())
        .map(|target| DisplayTarget { makefile, target })
        .join("\n\n");

    format!("{}\n\n{blocks}\n", variables.join("\n"))
}

/// Synthesise the `.PHONY` rule from the top-level list only.
fn phony_target(makefile: &Makefile) -> Option<Target> {
    let dependencies: Vec<Dependency> = makefile
        .listed_ids()
        .iter()
        .filter(|id| makefile.target(**id).is_some_and(|t| t.phony))
        .map(|id| Dependency::Target(*id))
        .collect();
    if dependencies.is_empty() {
        return None;
    }
    Some(Target {
        name: PHONY_TARGET.to_owned(),
        dependencies,
        ..Target::default()
    })
}

/// Empty chains would otherwise leave a blank recipe line.
fn emits_lines(command: &Command) -> bool {
    match command {
        Command::Chain(steps) => !steps.is_empty(),
        Command::Line(_) | Command::Conditional(_) => true,
    }
}

/// Write a conditional block. `item` returns `None` for entries to skip.
fn write_conditional<'a, T, D, F>(
    f: &mut Formatter<'_>,
    block: &'a Conditional<T>,
    item: F,
) -> fmt::Result
where
    D: Display,
    F: Fn(&'a T) -> Option<D>,
{
    for (idx, part) in block.parts.iter().enumerate() {
        if idx > 0 {
            writeln!(f)?;
        }
        f.write_str(&part.test)?;
        for entry in part.then.iter().filter_map(&item) {
            write!(f, "\n{entry}")?;
        }
    }
    write!(f, "\n{}", block.end)
}

/// A single assignment line, optionally scoped to a target.
struct DisplayAssignment<'a> {
    scope: Option<&'a str>,
    name: &'a str,
    assignment: &'a Assignment,
}

impl Display for DisplayAssignment<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(target) = self.scope {
            write!(f, "{target}:: ")?;
        }
        if self.assignment.export {
            f.write_str("export ")?;
        }
        write!(
            f,
            "{} {} {}",
            self.name,
            self.assignment.kind.operator(),
            self.assignment.value
        )
    }
}

/// A variable definition; conditionals span several lines and only the
/// assignment lines carry the target scope.
struct DisplayVariable<'a> {
    scope: Option<&'a str>,
    name: &'a str,
    variable: &'a Variable,
}

impl Display for DisplayVariable<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.variable {
            Variable::Assign(assignment) => DisplayAssignment {
                scope: self.scope,
                name: self.name,
                assignment,
            }
            .fmt(f),
            Variable::Conditional(block) => write_conditional(f, block, |assignment| {
                Some(DisplayAssignment {
                    scope: self.scope,
                    name: self.name,
                    assignment,
                })
            }),
        }
    }
}

/// One command group as recipe lines.
struct DisplayCommand<'a>(&'a Command);

impl Display for DisplayCommand<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            // Unindented comment lines are stripped by make instead of being
            // passed to the shell.
            Command::Line(line) if line.starts_with('#') => f.write_str(line),
            Command::Line(line) => write!(f, "{RECIPE_PREFIX}{line}"),
            Command::Chain(steps) => {
                for (idx, step) in steps.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" && \\\n")?;
                    }
                    write!(f, "{RECIPE_PREFIX}{step}")?;
                }
                Ok(())
            }
            Command::Conditional(block) => write_conditional(f, block, |command| {
                emits_lines(command).then_some(DisplayCommand(command))
            }),
        }
    }
}

/// A full rule block: scoped variables, declaration and recipe.
struct DisplayTarget<'a> {
    makefile: &'a Makefile,
    target: &'a Target,
}

impl Display for DisplayTarget<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let target = self.target;
        for (name, variable) in &target.variables {
            let scoped = DisplayVariable {
                scope: Some(&target.name),
                name,
                variable,
            };
            writeln!(f, "{scoped}")?;
        }
        write!(f, "{}::", target.name)?;
        for name in target
            .dependencies
            .iter()
            .filter_map(|dep| self.makefile.resolve(dep))
        {
            write!(f, " {name}")?;
        }
        for command in target.commands.iter().filter(|c| emits_lines(c)) {
            write!(f, "\n{}", DisplayCommand(command))?;
        }
        if target.auto_touch {
            write!(f, "\n{RECIPE_PREFIX}{TOUCH_COMMAND}")?;
        }
        Ok(())
    }
}
