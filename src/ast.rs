//! Makefile manifest Abstract Syntax Tree structures.
//!
//! These types mirror the YAML schema of a `makefile.yml` manifest. They are
//! deserialised from a [`serde_json::Value`] produced by the YAML parser, so
//! map ordering in the source file is preserved.
//!
//! ```rust
//! use provider_make::ast::{CommandSpec, MakeManifest};
//!
//! let json = serde_json::json!({
//!     "targets": [{ "name": "hello", "commands": ["echo hi"], "phony": true }]
//! });
//! let manifest: MakeManifest = serde_json::from_value(json).expect("parse");
//! assert_eq!(manifest.targets[0].commands, vec![CommandSpec::Line("echo hi".into())]);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::ir::AssignmentKind;

/// Ordered variable declarations as written in the manifest.
pub type VariableSpecs = IndexMap<String, VariableSpec>;

/// Top-level manifest structure.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MakeManifest {
    /// Global variables.
    #[serde(default, deserialize_with = "null_as_default")]
    pub variables: VariableSpecs,

    /// Goal built when `make` runs without arguments.
    #[serde(default, alias = "defaultTarget")]
    pub default_target: Option<String>,

    /// Rules in output order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub targets: Vec<TargetSpec>,
}

/// A target entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSpec {
    /// Rule name.
    pub name: String,

    /// Prerequisite names; names of other manifest targets are linked to
    /// those targets.
    #[serde(default, deserialize_with = "null_as_default")]
    pub dependencies: StringOrList,

    /// Target-specific variables.
    #[serde(default, deserialize_with = "null_as_default")]
    pub variables: VariableSpecs,

    /// Recipe command groups.
    #[serde(default, deserialize_with = "null_as_default")]
    pub commands: Vec<CommandSpec>,

    /// Declares that the target does not correspond to a real file.
    #[serde(default)]
    pub phony: bool,

    /// Touch the target file after the recipe runs.
    #[serde(default, alias = "autoTouch")]
    pub auto_touch: bool,
}

/// Assignment kind as spelled in the manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KindSpec {
    /// `:=`
    #[default]
    Simple,
    /// `?=`
    Conditional,
    /// `=`
    Recursive,
}

impl From<KindSpec> for AssignmentKind {
    fn from(value: KindSpec) -> Self {
        match value {
            KindSpec::Simple => Self::Simple,
            KindSpec::Conditional => Self::Conditional,
            KindSpec::Recursive => Self::Recursive,
        }
    }
}

/// A single assignment; a bare string is shorthand for a simple one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AssignmentSpec {
    /// `NAME: value`
    #[serde(deserialize_with = "scalar_string")]
    Value(String),
    /// `NAME: { value: ..., type: recursive, export: true }`
    Detailed(DetailedAssignment),
}

/// The mapping form of an [`AssignmentSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DetailedAssignment {
    /// Raw Make text.
    #[serde(deserialize_with = "scalar_string")]
    pub value: String,
    /// Assignment kind; defaults to simple.
    #[serde(default, rename = "type")]
    pub kind: KindSpec,
    /// Prefix with `export`.
    #[serde(default)]
    pub export: bool,
}

/// A conditional directive block in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, bound(deserialize = "T: Deserialize<'de>"))]
pub struct ConditionalSpec<T> {
    /// Branches in order; at least one is required.
    #[serde(deserialize_with = "non_empty")]
    pub parts: Vec<ConditionalPartSpec<T>>,
    /// Closing directive.
    #[serde(default = "default_end")]
    pub end: String,
}

/// One branch of a [`ConditionalSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, bound(deserialize = "T: Deserialize<'de>"))]
pub struct ConditionalPartSpec<T> {
    /// Opening directive line.
    pub test: String,
    /// Entries inside the branch.
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub then: Vec<T>,
}

/// Accept YAML scalars such as `10` or `true` as their textual form. A null
/// value is empty text.
pub(crate) fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => Ok(text),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        serde_json::Value::Bool(flag) => Ok(flag.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "expected a string, number or boolean, found {other}"
        ))),
    }
}

/// Treat an explicit null, such as a key with no value, like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items = Vec::<T>::deserialize(deserializer)?;
    if items.is_empty() {
        return Err(D::Error::custom(
            "a conditional block needs at least one part",
        ));
    }
    Ok(items)
}

fn default_end() -> String {
    String::from("endif")
}

/// A variable value: an assignment or a conditional block of assignments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum VariableSpec {
    /// Conditional block.
    Conditional(ConditionalSpec<AssignmentSpec>),
    /// Plain or detailed assignment.
    Assignment(AssignmentSpec),
}

/// A recipe command group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CommandSpec {
    /// One recipe line.
    Line(String),
    /// Steps sharing one shell, joined with `&&`.
    Chain(Vec<String>),
    /// Command groups guarded by conditional directives.
    Conditional(ConditionalSpec<CommandSpec>),
}

/// A helper for fields that accept either a single string or a list of
/// strings.
///
/// ```yaml
/// # Scalar
/// dependencies: build
/// # Sequence
/// dependencies:
///   - build
///   - test
/// ```
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum StringOrList {
    /// No value provided.
    #[default]
    Empty,
    /// A single string item.
    String(String),
    /// A list of string items.
    List(Vec<String>),
}

impl StringOrList {
    /// Borrow the items as a list.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::Empty => &[],
            Self::String(item) => std::slice::from_ref(item),
            Self::List(items) => items,
        }
    }
}
