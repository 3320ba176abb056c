//! Errors reported when validating a [`Makefile`](super::Makefile).

// miette/thiserror derives trip `unused_assignments` on some toolchains.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::Diagnostic;
use thiserror::Error;

/// Structural problems found by [`Makefile::validate`](super::Makefile::validate).
///
/// Rendering never fails; these only surface when a front end asks for
/// validation before writing the output.
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum MakefileError {
    /// A handle does not belong to the Makefile's arena.
    #[error("target handle #{index} referenced by {referrer} is not part of this Makefile")]
    #[diagnostic(code(provider_make::ir::unknown_target))]
    UnknownTarget {
        /// Arena index carried by the foreign handle.
        index: usize,
        /// Name of the referring target, or `targets` for the top-level list.
        referrer: String,
    },

    /// Targets with a recipe are reachable only as dependencies, so their
    /// recipes would never be rendered.
    #[error("targets with recipes are not listed in the Makefile: {}", .names.join(", "))]
    #[diagnostic(
        code(provider_make::ir::unlisted_recipes),
        help("list each target with Makefile::list or create it with Makefile::insert")
    )]
    UnlistedRecipes {
        /// Sorted names of the affected targets.
        names: Vec<String>,
    },

    /// Targets depend on each other in a loop.
    #[error("circular dependency detected: {}", .cycle.join(" -> "))]
    #[diagnostic(code(provider_make::ir::circular_dependency))]
    CircularDependency {
        /// Names along the cycle, starting and ending at the smallest name.
        cycle: Vec<String>,
    },
}
