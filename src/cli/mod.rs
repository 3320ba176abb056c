//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands.

use crate::config::MakeTemplate;
use crate::manifest::DEFAULT_MANIFEST;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate GNU Makefiles from YAML manifests and provider configuration.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the manifest file to use.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_MANIFEST)]
    pub file: PathBuf,

    /// Change to this directory before doing anything.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Enable verbose logging output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Optional subcommand to execute; defaults to `render` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Parse command-line arguments, providing `render` as the default command.
    #[must_use]
    pub fn parse_with_default() -> Self {
        Self::parse().with_default_command()
    }

    /// Parse the provided arguments, applying the default command when needed.
    ///
    /// # Errors
    ///
    /// Returns the clap error when the arguments are invalid.
    pub fn try_parse_from_with_default<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self::try_parse_from(args)?.with_default_command())
    }

    /// Apply the default command if none was specified.
    #[must_use]
    pub fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::default());
        }
        self
    }
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Render the manifest as a Makefile `default`.
    Render {
        /// Output path for the generated Makefile; `-` writes to stdout.
        #[arg(value_name = "OUTPUT", default_value = "-")]
        output: PathBuf,
    },

    /// Generate a provider Makefile from a provider `config.yaml`.
    Provider {
        /// Provider configuration file.
        #[arg(long, value_name = "FILE")]
        config: PathBuf,

        /// Override the Makefile layout named in the configuration.
        #[arg(long, value_enum, value_name = "TEMPLATE")]
        template: Option<MakeTemplate>,

        /// Output path for the generated Makefile; `-` writes to stdout.
        #[arg(value_name = "OUTPUT", default_value = "Makefile")]
        output: PathBuf,
    },

    /// Load and validate the manifest without writing anything.
    Check,
}

impl Default for Commands {
    fn default() -> Self {
        Self::Render {
            output: PathBuf::from("-"),
        }
    }
}
