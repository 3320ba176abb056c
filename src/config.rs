//! Provider configuration consumed by the graph builders.
//!
//! Builders take a [`ProviderConfig`] explicitly instead of reading ambient
//! state, so a Makefile is a pure function of its configuration. Files are
//! the per-provider `config.yaml`; keys used only by CI workflow generation
//! are ignored.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which Makefile layout to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MakeTemplate {
    /// First-generation layout built from phony targets only.
    #[default]
    Bridged,
    /// Sentinel-file layout with incremental SDK builds.
    BridgedV2,
}

/// A plugin installed before code generation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Plugin {
    /// Plugin name, e.g. `aws`.
    pub name: String,
    /// Version passed to `pulumi plugin install`.
    #[serde(deserialize_with = "crate::ast::scalar_string")]
    pub version: String,
}

/// Per-provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Short provider name (`PACK`), e.g. `random`.
    pub provider: String,

    /// Major version of the provider module; above 1 the Go module lives
    /// under `provider/vN`.
    #[serde(rename = "major-version", default = "default_major_version")]
    pub major_version: u32,

    /// Extra Go symbol to stamp with the version through `-ldflags`.
    #[serde(default, deserialize_with = "crate::ast::null_as_default")]
    pub provider_version: String,

    /// Plugins to install.
    #[serde(default, deserialize_with = "crate::ast::null_as_default")]
    pub plugins: Vec<Plugin>,

    /// Makefile layout.
    #[serde(default)]
    pub make_template: MakeTemplate,
}

const fn default_major_version() -> u32 {
    2
}

impl ProviderConfig {
    /// Configuration with defaults for everything but the provider name.
    #[must_use]
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            major_version: default_major_version(),
            provider_version: String::new(),
            plugins: Vec::new(),
            make_template: MakeTemplate::default(),
        }
    }

    /// Load a provider `config.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not contain a
    /// valid configuration.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        crate::manifest::load(path.as_ref())
    }

    /// Parse configuration YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or misses required keys.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(crate::manifest::parse_document(yaml, "config.yaml")?)
    }

    /// Directory of the Go provider module relative to the repository root.
    #[must_use]
    pub fn provider_path(&self) -> String {
        if self.major_version > 1 {
            format!("provider/v{}", self.major_version)
        } else {
            String::from("provider")
        }
    }
}
