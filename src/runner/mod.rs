//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! loads the requested front end, validates the resulting graph, renders it
//! and writes the text out.

mod error;
mod output;
mod path_helpers;

pub use error::RunnerError;
pub use output::{is_stdout_path, write_makefile, write_stdout};

use crate::builders;
use crate::cli::{Cli, Commands};
use crate::config::{MakeTemplate, ProviderConfig};
use crate::ir::Makefile;
use crate::{make_gen, manifest};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use path_helpers::{ensure_manifest_exists_or_error, resolve_cli_path, resolve_manifest_path};

/// Execute the parsed [`Cli`] command.
///
/// # Errors
///
/// Returns an error if loading, validation or writing fails.
pub fn run(cli: &Cli) -> Result<()> {
    let command = cli.command.clone().unwrap_or_default();
    match command {
        Commands::Render { output } => {
            let makefile = load_manifest_makefile(cli)?;
            emit(cli, &makefile, &output)
        }
        Commands::Provider {
            config,
            template,
            output,
        } => {
            let makefile = build_provider_makefile(cli, &config, template)?;
            emit(cli, &makefile, &output)
        }
        Commands::Check => {
            let makefile = load_manifest_makefile(cli)?;
            info!(
                targets = makefile.listed_ids().len(),
                "manifest is valid"
            );
            Ok(())
        }
    }
}

/// Load the manifest named by `cli` and lower it to a validated graph.
fn load_manifest_makefile(cli: &Cli) -> Result<Makefile> {
    let manifest_path = resolve_manifest_path(cli)?;
    ensure_manifest_exists_or_error(cli, &manifest_path)?;
    let manifest = manifest::from_path(manifest_path.as_std_path())
        .with_context(|| format!("loading manifest {manifest_path}"))?;
    debug!(
        variables = manifest.variables.len(),
        targets = manifest.targets.len(),
        "parsed manifest"
    );
    let makefile = Makefile::from_manifest(&manifest);
    makefile
        .validate()
        .with_context(|| format!("invalid build graph in {manifest_path}"))?;
    Ok(makefile)
}

/// Load a provider configuration and run the selected builder.
fn build_provider_makefile(
    cli: &Cli,
    config_path: &Path,
    template: Option<MakeTemplate>,
) -> Result<Makefile> {
    let path = resolve_cli_path(cli, config_path);
    let mut config = ProviderConfig::from_path(path.as_ref())
        .with_context(|| format!("loading provider config {}", path.display()))?;
    if let Some(choice) = template {
        config.make_template = choice;
    }
    let makefile = builders::build_makefile(&config);
    makefile
        .validate()
        .context("provider builder produced an invalid graph")?;
    Ok(makefile)
}

/// Render `makefile` and write it to `output`, or stdout for `-`.
fn emit(cli: &Cli, makefile: &Makefile, output: &Path) -> Result<()> {
    let text = make_gen::render(makefile);
    if is_stdout_path(output) {
        write_stdout(&text)
    } else {
        let output_path = resolve_cli_path(cli, output);
        write_makefile(output_path.as_ref(), &text)
    }
}

#[cfg(test)]
mod tests;
