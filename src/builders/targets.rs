//! Reusable target factories and shell helpers for graph builders.

use crate::ir::Target;
use itertools::Itertools;

/// Join commands with `&&` into one shell line.
///
/// ```
/// use provider_make::builders::targets::shell_chain;
/// assert_eq!(shell_chain(["make", "make install"]), "make && make install");
/// ```
#[must_use]
pub fn shell_chain<I, S>(commands: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    commands
        .into_iter()
        .map(|command| command.as_ref().to_owned())
        .join(" && ")
}

/// Run `commands` from inside `dir` on one shell line.
#[must_use]
pub fn cwd(dir: &str, commands: &[&str]) -> String {
    shell_chain(std::iter::once(format!("cd {dir}")).chain(commands.iter().map(|c| (*c).to_owned())))
}

/// `help` target listing documented targets from the generated Makefile.
#[must_use]
pub fn help() -> Target {
    Target::new("help").phony().commands([
        r"@grep '^[^.#]\+:\s\+.*#' Makefile | \",
        concat!(
            r#"sed "s/\(.\+\):\s*\(.*\) #\s*\(.*\)/`printf "\033[93m"`\1`printf "\033[0m"`"#,
            "\t",
            r#"\3 [\2]/" | \"#,
        ),
        "expand -t20",
    ])
}

/// Shell line writing a throwaway `go.mod` that hides an SDK directory from
/// Go tooling.
#[must_use]
pub fn fake_go_module(language: &str, go_version: &str, path: &str) -> String {
    format!(
        r#"echo "module fake_{language}_module // Exclude this directory from Go tools\n\ngo {go_version}" > {path}"#
    )
}
