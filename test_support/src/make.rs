//! Helpers for running GNU Make against generated output.

use anyhow::{Context, Result, ensure};
use provider_make::ir::Makefile;
use provider_make::make_gen;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Whether a working `make` is on `PATH`.
///
/// Tests that need it print a skip notice and return early when it is not.
pub fn make_available() -> bool {
    Command::new("make")
        .arg("--version")
        .output()
        .is_ok_and(|out| out.status.success())
}

/// Render `makefile` into `dir` and run `make -n` for `goals`.
///
/// Returns the commands make would execute, one per line.
///
/// # Errors
///
/// Returns an error if the file cannot be written or make exits non-zero.
pub fn make_dry_run(dir: &Path, makefile: &Makefile, goals: &[&str]) -> Result<String> {
    let path = dir.join("Makefile");
    fs::write(&path, make_gen::render(makefile))
        .with_context(|| format!("write {}", path.display()))?;
    let out = Command::new("make")
        .arg("-n")
        .arg("-f")
        .arg(&path)
        .args(goals)
        .current_dir(dir)
        .output()
        .context("spawn make")?;
    ensure!(
        out.status.success(),
        "make failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout).context("make stdout is not UTF-8")
}
