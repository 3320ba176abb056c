//! Manifest-to-IR conversion helpers.

use std::collections::HashMap;

use crate::ast::{
    AssignmentSpec, CommandSpec, ConditionalSpec, MakeManifest, TargetSpec, VariableSpec,
    VariableSpecs,
};

use super::{
    Assignment, Command, Conditional, ConditionalPart, Dependency, Makefile, Target, TargetId,
    Variable, VariableTable,
};

impl Makefile {
    /// Transform a manifest into a [`Makefile`].
    ///
    /// Every manifest target is listed in manifest order. A dependency that
    /// names a manifest target becomes a handle to the first target with
    /// that name; any other name is kept as a literal prerequisite.
    #[must_use]
    pub fn from_manifest(manifest: &MakeManifest) -> Self {
        let mut makefile = Self::new();
        for (name, spec) in &manifest.variables {
            makefile.set_variable(name.clone(), to_variable(spec));
        }

        let ids: Vec<TargetId> = manifest
            .targets
            .iter()
            .map(|spec| makefile.insert(to_target(spec)))
            .collect();
        let mut by_name: HashMap<&str, TargetId> = HashMap::new();
        for (spec, id) in manifest.targets.iter().zip(&ids) {
            by_name.entry(spec.name.as_str()).or_insert(*id);
        }

        for (spec, id) in manifest.targets.iter().zip(&ids) {
            let dependencies = spec
                .dependencies
                .as_slice()
                .iter()
                .map(|name| link(name, &by_name))
                .collect();
            if let Some(target) = makefile.target_mut(*id) {
                target.dependencies = dependencies;
            }
        }

        if let Some(goal) = &manifest.default_target {
            makefile.set_default_target(link(goal, &by_name));
        }
        tracing::debug!(
            targets = ids.len(),
            variables = manifest.variables.len(),
            "converted manifest to Makefile"
        );
        makefile
    }
}

fn link(name: &str, by_name: &HashMap<&str, TargetId>) -> Dependency {
    by_name
        .get(name)
        .map_or_else(|| Dependency::Name(name.to_owned()), |id| Dependency::Target(*id))
}

fn to_target(spec: &TargetSpec) -> Target {
    Target {
        name: spec.name.clone(),
        dependencies: Vec::new(),
        variables: to_variables(&spec.variables),
        commands: spec.commands.iter().map(to_command).collect(),
        phony: spec.phony,
        auto_touch: spec.auto_touch,
    }
}

fn to_variables(specs: &VariableSpecs) -> VariableTable {
    specs
        .iter()
        .map(|(name, spec)| (name.clone(), to_variable(spec)))
        .collect()
}

fn to_assignment(spec: &AssignmentSpec) -> Assignment {
    match spec {
        AssignmentSpec::Value(value) => Assignment::simple(value.clone()),
        AssignmentSpec::Detailed(detailed) => Assignment {
            value: detailed.value.clone(),
            kind: detailed.kind.into(),
            export: detailed.export,
        },
    }
}

fn to_variable(spec: &VariableSpec) -> Variable {
    match spec {
        VariableSpec::Assignment(assignment) => Variable::Assign(to_assignment(assignment)),
        VariableSpec::Conditional(block) => {
            Variable::Conditional(to_conditional(block, to_assignment))
        }
    }
}

fn to_command(spec: &CommandSpec) -> Command {
    match spec {
        CommandSpec::Line(line) => Command::Line(line.clone()),
        CommandSpec::Chain(steps) => Command::Chain(steps.clone()),
        CommandSpec::Conditional(block) => Command::Conditional(to_conditional(block, to_command)),
    }
}

fn to_conditional<S, T>(spec: &ConditionalSpec<S>, convert: fn(&S) -> T) -> Conditional<T> {
    Conditional {
        parts: spec
            .parts
            .iter()
            .map(|part| ConditionalPart {
                test: part.test.clone(),
                then: part.then.iter().map(convert).collect(),
            })
            .collect(),
        end: spec.end.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{DetailedAssignment, KindSpec, StringOrList};

    fn target(name: &str, deps: &[&str]) -> TargetSpec {
        TargetSpec {
            name: name.into(),
            dependencies: StringOrList::List(deps.iter().map(|d| (*d).to_owned()).collect()),
            variables: VariableSpecs::new(),
            commands: Vec::new(),
            phony: false,
            auto_touch: false,
        }
    }

    #[test]
    fn names_of_manifest_targets_become_handles() {
        let manifest = MakeManifest {
            targets: vec![target("a", &["b", "file.txt"]), target("b", &[])],
            ..MakeManifest::default()
        };
        let makefile = Makefile::from_manifest(&manifest);
        let a = makefile.arena().first().expect("target a");
        assert_eq!(
            a.dependencies,
            vec![
                Dependency::Target(makefile.listed_ids()[1]),
                Dependency::from("file.txt"),
            ]
        );
    }

    #[test]
    fn default_target_links_by_name() {
        let manifest = MakeManifest {
            default_target: Some("b".into()),
            targets: vec![target("a", &[]), target("b", &[])],
            ..MakeManifest::default()
        };
        let makefile = Makefile::from_manifest(&manifest);
        assert_eq!(
            makefile.default_target(),
            Some(&Dependency::Target(makefile.listed_ids()[1]))
        );
    }

    #[test]
    fn detailed_assignments_keep_kind_and_export() {
        let mut variables = VariableSpecs::new();
        variables.insert(
            "VERSION".into(),
            VariableSpec::Assignment(AssignmentSpec::Detailed(DetailedAssignment {
                value: "$(shell git describe)".into(),
                kind: KindSpec::Recursive,
                export: true,
            })),
        );
        let manifest = MakeManifest {
            variables,
            ..MakeManifest::default()
        };
        let makefile = Makefile::from_manifest(&manifest);
        assert_eq!(
            makefile.variables().get("VERSION"),
            Some(&Variable::Assign(
                Assignment::recursive("$(shell git describe)").exported()
            ))
        );
    }
}
