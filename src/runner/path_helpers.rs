//! Path resolution helpers for the runner module.
//!
//! Centralises manifest and output path logic so the main runner module stays
//! focused on command dispatch.

use crate::cli::Cli;
use anyhow::{Result, anyhow};
use camino::Utf8PathBuf;
use std::borrow::Cow;
use std::path::Path;

use super::RunnerError;

/// Determine the manifest path respecting the CLI's directory option.
///
/// # Errors
/// Returns an error when the CLI `file` or `directory` paths are not valid UTF-8.
pub(super) fn resolve_manifest_path(cli: &Cli) -> Result<Utf8PathBuf> {
    let file = Utf8PathBuf::from_path_buf(cli.file.clone())
        .map_err(|path| anyhow!("manifest path {} is not valid UTF-8", path.display()))?;
    let resolved = if let Some(dir) = &cli.directory {
        let base = Utf8PathBuf::from_path_buf(dir.clone())
            .map_err(|path| anyhow!("directory {} is not valid UTF-8", path.display()))?;
        base.join(&file)
    } else {
        file
    };
    if resolved.file_name().is_none() {
        return Err(anyhow!("manifest path {resolved} has no file name"));
    }
    Ok(resolved)
}

/// Resolve a command-line path relative to the CLI working directory.
///
/// The `-C/--directory` option behaves like a working directory change for
/// any filesystem paths supplied on the command line.
#[must_use]
pub(super) fn resolve_cli_path<'a>(cli: &Cli, path: &'a Path) -> Cow<'a, Path> {
    if path.is_relative() {
        cli.directory
            .as_ref()
            .map_or_else(|| Cow::Borrowed(path), |dir| Cow::Owned(dir.join(path)))
    } else {
        Cow::Borrowed(path)
    }
}

pub(super) fn ensure_manifest_exists_or_error(
    cli: &Cli,
    manifest_path: &Utf8PathBuf,
) -> Result<()> {
    if manifest_path.as_std_path().exists() {
        return Ok(());
    }

    // `resolve_manifest_path()` validates that `file_name()` is Some.
    let manifest_name = manifest_path
        .file_name()
        .ok_or_else(|| anyhow!("manifest path {manifest_path} has no file name"))?
        .to_owned();
    let directory = if cli.directory.is_some() {
        let parent = manifest_path
            .parent()
            .map_or_else(|| manifest_path.as_str(), camino::Utf8Path::as_str);
        format!("directory `{parent}`")
    } else {
        String::from("the current directory")
    };
    Err(RunnerError::ManifestNotFound {
        manifest_name,
        directory,
        path: manifest_path.to_path_buf().into_std_path_buf(),
    }
    .into())
}
