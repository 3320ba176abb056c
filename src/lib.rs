//! Makefile generation library.
//!
//! Describes GNU Make build graphs as a typed arena of targets, builds them
//! from YAML manifests or provider configuration, and renders deterministic
//! Makefile text.

pub mod ast;
pub mod builders;
pub mod cli;
pub mod config;
pub mod ir;
pub mod make_gen;
pub mod manifest;
pub mod runner;
