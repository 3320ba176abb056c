//! Error types for the runner module.
//!
//! This submodule isolates derive-macro-affected code to scope lint suppressions
//! narrowly.

// The unused_assignments lint fires in some Rust versions due to
// thiserror/miette derive macro expansion, so `#[expect]` cannot be used.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised during command execution.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// The manifest file does not exist at the expected path.
    #[error("no `{manifest_name}` found in {directory}")]
    #[diagnostic(
        code(provider_make::runner::manifest_not_found),
        help("create the manifest or pass `-f` to name a different file")
    )]
    ManifestNotFound {
        /// Name of the expected manifest file (e.g., "makefile.yml").
        manifest_name: String,
        /// Directory description (e.g., "the current directory").
        directory: String,
        /// The path that was attempted.
        path: PathBuf,
    },
}
