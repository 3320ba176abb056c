//! Manifest loading helpers.
//!
//! A manifest is parsed in two steps. `serde_saphyr` first turns the YAML
//! into a [`serde_json::Value`] that keeps mapping order and YAML nulls.
//! The value is then deserialised into [`MakeManifest`]. The same loader
//! reads provider configuration files.

use crate::ast::MakeManifest;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::{fs, path::Path};

mod diagnostics;
mod value;

pub use diagnostics::ManifestError;
use value::YamlValue;

/// Default manifest file name.
pub const DEFAULT_MANIFEST: &str = "makefile.yml";

/// Parse YAML text into any deserialisable document type.
///
/// `name` labels the source in error messages.
///
/// # Errors
///
/// Returns [`ManifestError::Yaml`] for malformed YAML and
/// [`ManifestError::Schema`] when the document does not match `T`.
pub fn parse_document<T: DeserializeOwned>(yaml: &str, name: &str) -> Result<T, ManifestError> {
    let YamlValue(doc) = serde_saphyr::from_str(yaml).map_err(|err| ManifestError::Yaml {
        name: name.to_owned(),
        message: err.to_string(),
    })?;
    serde_json::from_value(doc).map_err(|source| ManifestError::Schema {
        name: name.to_owned(),
        source,
    })
}

/// Parse a manifest string.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or does not match the schema.
pub fn from_str(yaml: &str) -> Result<MakeManifest> {
    Ok(parse_document(yaml, DEFAULT_MANIFEST)?)
}

/// Load a [`MakeManifest`] from the given file path.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the YAML fails to parse.
pub fn from_path(path: impl AsRef<Path>) -> Result<MakeManifest> {
    load(path.as_ref())
}

/// Read and parse a YAML document from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed into `T`.
pub(crate) fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let doc = parse_document(&data, &path.display().to_string())?;
    tracing::debug!(path = %path.display(), "parsed YAML document");
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CommandSpec;

    #[test]
    fn manifest_preserves_variable_order() {
        let yaml = concat!(
            "variables:\n",
            "  ZED: 1\n",
            "  ALPHA: two\n",
            "  MID: { value: \"$(shell pwd)\", type: recursive }\n",
            "targets: []\n",
        );
        let manifest = from_str(yaml).expect("parse");
        let names: Vec<_> = manifest.variables.keys().map(String::as_str).collect();
        assert_eq!(names, ["ZED", "ALPHA", "MID"]);
    }

    #[test]
    fn manifest_parses_command_groups() {
        let yaml = concat!(
            "targets:\n",
            "  - name: build\n",
            "    commands:\n",
            "      - echo hi\n",
            "      - [cd x, go build]\n",
        );
        let manifest = from_str(yaml).expect("parse");
        assert_eq!(
            manifest.targets[0].commands,
            vec![
                CommandSpec::Line("echo hi".into()),
                CommandSpec::Chain(vec!["cd x".into(), "go build".into()]),
            ]
        );
    }

    #[test]
    fn malformed_yaml_reports_yaml_error() {
        let err = parse_document::<MakeManifest>("targets: [", "broken.yml").expect_err("error");
        assert!(matches!(err, ManifestError::Yaml { ref name, .. } if name == "broken.yml"));
    }

    #[test]
    fn schema_mismatch_reports_schema_error() {
        let err = parse_document::<MakeManifest>("targets: 3\n", "bad.yml").expect_err("error");
        assert!(matches!(err, ManifestError::Schema { .. }));
    }
}
