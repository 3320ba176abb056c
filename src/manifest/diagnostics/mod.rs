//! Errors raised while loading YAML documents.

// miette/thiserror derives trip `unused_assignments` on some toolchains.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::Diagnostic;
use thiserror::Error;

/// Error raised when a manifest or configuration document cannot be parsed.
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    /// The text is not valid YAML.
    #[error("{name} is not valid YAML: {message}")]
    #[diagnostic(
        code(provider_make::manifest::yaml),
        help("YAML indentation must use spaces, not tabs")
    )]
    Yaml {
        /// Label of the source document.
        name: String,
        /// Parser message including the location.
        message: String,
    },

    /// The YAML is well formed but does not match the expected schema.
    #[error("{name} does not match the expected schema")]
    #[diagnostic(code(provider_make::manifest::schema))]
    Schema {
        /// Label of the source document.
        name: String,
        /// Underlying deserialisation error.
        #[source]
        source: serde_json::Error,
    },
}
