//! Make variable assignments.
//!
//! A [`Variable`] is either a single [`Assignment`] or a [`Conditional`]
//! block choosing between assignments at `make` parse time. Values are opaque
//! Make text: nothing here escapes or validates them.

use indexmap::IndexMap;

/// Insertion-ordered table of variables keyed by name.
///
/// Ordering has no meaning to `make` but keeps generated output stable.
pub type VariableTable = IndexMap<String, Variable>;

/// Expansion semantics of an assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AssignmentKind {
    /// Immediate expansion (`:=`), evaluated once when the line is read.
    #[default]
    Simple,
    /// Assign only when the variable is unset (`?=`).
    Conditional,
    /// Deferred expansion (`=`), evaluated on every reference.
    Recursive,
}

impl AssignmentKind {
    /// The Make operator for this kind.
    #[must_use]
    pub const fn operator(self) -> &'static str {
        match self {
            Self::Simple => ":=",
            Self::Conditional => "?=",
            Self::Recursive => "=",
        }
    }
}

/// A value together with its assignment kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Raw Make text assigned to the variable.
    pub value: String,
    /// Operator used for the assignment.
    pub kind: AssignmentKind,
    /// Prefix the assignment with `export`.
    pub export: bool,
}

impl Assignment {
    /// Build an assignment of the given kind.
    #[must_use]
    pub fn new(value: impl Into<String>, kind: AssignmentKind) -> Self {
        Self {
            value: value.into(),
            kind,
            export: false,
        }
    }

    /// Immediate (`:=`) assignment.
    #[must_use]
    pub fn simple(value: impl Into<String>) -> Self {
        Self::new(value, AssignmentKind::Simple)
    }

    /// Assign-if-unset (`?=`) assignment.
    #[must_use]
    pub fn conditional(value: impl Into<String>) -> Self {
        Self::new(value, AssignmentKind::Conditional)
    }

    /// Deferred (`=`) assignment.
    #[must_use]
    pub fn recursive(value: impl Into<String>) -> Self {
        Self::new(value, AssignmentKind::Recursive)
    }

    /// Mark the variable for export to recipe environments.
    #[must_use]
    pub const fn exported(mut self) -> Self {
        self.export = true;
        self
    }
}

impl From<&str> for Assignment {
    fn from(value: &str) -> Self {
        Self::simple(value)
    }
}

impl From<String> for Assignment {
    fn from(value: String) -> Self {
        Self::simple(value)
    }
}

/// One branch of a [`Conditional`] block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalPart<T> {
    /// Directive line opening the branch, e.g. `ifeq ($(OS),Windows_NT)` or
    /// `else`.
    pub test: String,
    /// Items emitted inside the branch.
    pub then: Vec<T>,
}

/// A Make conditional directive block.
///
/// Directive text is emitted verbatim; nesting is whatever the caller builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditional<T> {
    /// Branches in order of appearance.
    pub parts: Vec<ConditionalPart<T>>,
    /// Closing directive, normally `endif`.
    pub end: String,
}

impl<T> Conditional<T> {
    /// Start a block with one branch.
    #[must_use]
    pub fn new(test: impl Into<String>, then: Vec<T>) -> Self {
        Self {
            parts: vec![ConditionalPart {
                test: test.into(),
                then,
            }],
            end: String::from("endif"),
        }
    }

    /// Append a further branch, such as `else`.
    #[must_use]
    pub fn or(mut self, test: impl Into<String>, then: Vec<T>) -> Self {
        self.parts.push(ConditionalPart {
            test: test.into(),
            then,
        });
        self
    }
}

/// A variable definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variable {
    /// A single assignment.
    Assign(Assignment),
    /// Assignments guarded by conditional directives.
    Conditional(Conditional<Assignment>),
}

impl From<Assignment> for Variable {
    fn from(value: Assignment) -> Self {
        Self::Assign(value)
    }
}

impl From<Conditional<Assignment>> for Variable {
    fn from(value: Conditional<Assignment>) -> Self {
        Self::Conditional(value)
    }
}

impl From<&str> for Variable {
    fn from(value: &str) -> Self {
        Self::Assign(Assignment::simple(value))
    }
}

impl From<String> for Variable {
    fn from(value: String) -> Self {
        Self::Assign(Assignment::simple(value))
    }
}
