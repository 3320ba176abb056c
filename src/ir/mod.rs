//! In-memory Makefile model.
//!
//! A [`Makefile`] owns an arena of [`Target`]s addressed by [`TargetId`], a
//! global [`VariableTable`] and the ordered list of targets that get a rule
//! block. Dependencies hold either literal names or handles, so a shared
//! target is declared once and renamed in one place.
//!
//! # Examples
//!
//! ```
//! use provider_make::ir::{Makefile, Target};
//!
//! let mut makefile = Makefile::new();
//! makefile.set_variable("V", "1");
//! let install = makefile.insert(Target::new("install").phony().command("npm ci"));
//! makefile.insert(Target::new("build").phony().depends_on(install));
//! makefile.insert(Target::new("test").phony().depends_on(install));
//! assert!(makefile.validate().is_ok());
//! ```

mod error;
mod from_manifest;
mod makefile;
mod target;
mod validate;
mod variable;

pub use error::MakefileError;
pub use makefile::Makefile;
pub use target::{Command, Dependency, Target, TargetId};
pub use variable::{
    Assignment, AssignmentKind, Conditional, ConditionalPart, Variable, VariableTable,
};
