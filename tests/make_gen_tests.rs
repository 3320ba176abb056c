//! Rendering tests for the Makefile generator.
//!
//! These exercise the public `ir` builders and `make_gen::render` end to end,
//! covering operators, dependency resolution, phony aggregation and recipe
//! formatting.

use provider_make::ir::{Assignment, Command, Conditional, Makefile, Target, Variable};
use provider_make::make_gen::render;
use rstest::rstest;

fn single(target: Target) -> Makefile {
    let mut makefile = Makefile::new();
    makefile.insert(target);
    makefile
}

#[test]
fn render_is_idempotent_and_leaves_input_untouched() {
    let mut makefile = Makefile::new();
    makefile.set_variable("V", "1");
    let a = makefile.insert(Target::new("a").phony().command("echo a"));
    makefile.insert(Target::new("b").depends_on(a).chain(["cd x", "make"]));
    let before = makefile.clone();

    let first = render(&makefile);
    let second = render(&makefile);

    assert_eq!(first, second);
    assert_eq!(makefile, before);
    assert_eq!(makefile.listed_ids().len(), 2);
}

#[rstest]
#[case(Assignment::simple("1"), "X := 1")]
#[case(Assignment::conditional("1"), "X ?= 1")]
#[case(Assignment::recursive("1"), "X = 1")]
#[case(Assignment::simple("1").exported(), "export X := 1")]
fn operators_follow_assignment_kind(#[case] assignment: Assignment, #[case] line: &str) {
    let mut makefile = Makefile::new();
    makefile.set_variable("X", assignment);
    assert_eq!(render(&makefile), format!("{line}\n\n\n"));
}

#[rstest]
#[case(true)]
#[case(false)]
fn handle_dependencies_render_target_name(#[case] list_a: bool) {
    let mut makefile = Makefile::new();
    let a = makefile.add(Target::new("a"));
    if list_a {
        makefile.list(a);
    }
    makefile.insert(Target::new("b").depends_on(a).depends_on("c"));

    let text = render(&makefile);

    assert!(text.contains("\nb:: a c\n"));
    assert_eq!(text.contains("\na::"), list_a);
}

#[test]
fn renaming_a_shared_target_updates_every_dependent() {
    let mut makefile = Makefile::new();
    let shared = makefile.insert(Target::new("install"));
    makefile.insert(Target::new("build").depends_on(shared));
    makefile.insert(Target::new("test").depends_on(shared));
    if let Some(target) = makefile.target_mut(shared) {
        target.name = String::from("setup");
    }

    let text = render(&makefile);

    assert!(text.contains("\nbuild:: setup\n"));
    assert!(text.ends_with("\ntest:: setup\n"));
    assert!(!text.contains("install"));
}

#[test]
fn diamond_dependency_renders_once() {
    let mut makefile = Makefile::new();
    let a = makefile.insert(Target::new("a").command("touch a"));
    makefile.insert(Target::new("b").depends_on(a));
    makefile.insert(Target::new("c").depends_on(a));

    let text = render(&makefile);

    assert_eq!(text.matches("a::").count(), 1);
    assert_eq!(text, "\n\na::\n\ttouch a\n\nb:: a\n\nc:: a\n");
}

#[test]
fn phony_rule_lists_only_phony_targets() {
    let mut makefile = Makefile::new();
    makefile.insert(Target::new("clean").phony().command("rm -rf out"));
    makefile.insert(Target::new("build").command("make"));

    let text = render(&makefile);

    assert!(text.ends_with("\n.PHONY:: clean\n"));
}

#[test]
fn no_phony_targets_means_no_phony_rule() {
    let text = render(&single(Target::new("build").command("make")));
    assert!(!text.contains(".PHONY"));
}

#[test]
fn chained_group_shares_one_shell() {
    let text = render(&single(Target::new("t").chain(["cd x", "go build"])));
    assert_eq!(text, "\n\nt::\n\tcd x && \\\n\tgo build\n");
}

#[test]
fn separate_groups_are_independent_lines() {
    let text = render(&single(Target::new("t").commands(["echo hi", "echo bye"])));
    assert_eq!(text, "\n\nt::\n\techo hi\n\techo bye\n");
    assert!(!text.contains("&&"));
}

#[test]
fn end_to_end_scenario() {
    let mut makefile = Makefile::new();
    makefile.set_variable("V", "1");
    makefile.insert(
        Target::new("t")
            .depends_on("x")
            .command("echo hi")
            .phony(),
    );
    assert_eq!(render(&makefile), "V := 1\n\nt:: x\n\techo hi\n\n.PHONY:: t\n");
}

#[test]
fn scoped_variables_precede_declaration() {
    let target = Target::new("build_python")
        .variable("PYPI_VERSION", "$(shell pulumictl get version --language python)")
        .variable("MODE", Assignment::conditional("release"))
        .command("python3 setup.py build");
    assert_eq!(
        render(&single(target)),
        concat!(
            "\n\n",
            "build_python:: PYPI_VERSION := $(shell pulumictl get version --language python)\n",
            "build_python:: MODE ?= release\n",
            "build_python::\n",
            "\tpython3 setup.py build\n",
        )
    );
}

#[test]
fn conditional_variable_renders_directives_flush_left() {
    let mut makefile = Makefile::new();
    makefile.set_variable(
        "OS_NAME",
        Variable::Conditional(
            Conditional::new("ifeq ($(OS),Windows_NT)", vec![Assignment::simple("windows")])
                .or("else", vec![Assignment::simple("unix")]),
        ),
    );
    assert_eq!(
        render(&makefile),
        concat!(
            "ifeq ($(OS),Windows_NT)\n",
            "OS_NAME := windows\n",
            "else\n",
            "OS_NAME := unix\n",
            "endif\n\n\n",
        )
    );
}

#[test]
fn conditional_commands_nest_recipe_groups() {
    let target = Target::new("install").command(Conditional::new(
        "ifdef CI",
        vec![
            Command::from("npm ci"),
            Command::from(vec![String::from("cd sdk"), String::from("npm ci")]),
        ],
    ));
    assert_eq!(
        render(&single(target)),
        concat!(
            "\n\ninstall::\n",
            "ifdef CI\n",
            "\tnpm ci\n",
            "\tcd sdk && \\\n",
            "\tnpm ci\n",
            "endif\n",
        )
    );
}

#[test]
fn default_goal_follows_renamed_handle() {
    let mut makefile = Makefile::new();
    makefile.set_variable("V", "1");
    let dev = makefile.insert(Target::new("dev").phony());
    makefile.set_default_target(dev);
    if let Some(target) = makefile.target_mut(dev) {
        target.name = String::from("development");
    }
    assert_eq!(
        render(&makefile),
        "V := 1\n.DEFAULT_GOAL := development\n\ndevelopment::\n\n.PHONY:: development\n"
    );
}

#[test]
fn comment_lines_are_not_indented() {
    let text = render(&single(Target::new("t").commands(["# build step", "make"])));
    assert_eq!(text, "\n\nt::\n# build step\n\tmake\n");
}

#[test]
fn auto_touch_appends_touch_command() {
    let text = render(&single(Target::new("out.sentinel").auto_touch().command("gen")));
    assert_eq!(text, "\n\nout.sentinel::\n\tgen\n\t@touch $@\n");
}

#[test]
fn rendered_lines_have_no_trailing_whitespace() {
    let mut makefile = Makefile::new();
    makefile.set_variable("A", "1");
    makefile.insert(Target::new("empty").phony());
    makefile.insert(Target::new("t").chain(Vec::<String>::new()).command("echo"));
    let text = render(&makefile);
    for line in text.lines() {
        assert_eq!(line, line.trim_end(), "trailing whitespace in {line:?}");
    }
}

#[test]
fn empty_makefile_renders_separators_only() {
    assert_eq!(render(&Makefile::new()), "\n\n\n");
}
