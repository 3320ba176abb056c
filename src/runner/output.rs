//! Output helpers for generated Makefiles.
//! Writes to capability-based directories or to stdout.

use anyhow::{Context, Result as AnyResult, anyhow};
use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use std::io;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Return `true` when `path` is the CLI sentinel indicating "write to stdout".
#[must_use]
pub fn is_stdout_path(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Write the Makefile text to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error when the path is not UTF-8 or any filesystem step fails.
pub fn write_makefile(path: &Path, content: &str) -> AnyResult<()> {
    let utf8_path = Utf8Path::from_path(path)
        .ok_or_else(|| anyhow!("output path {} is not valid UTF-8", path.display()))?;
    let file_name = utf8_path
        .file_name()
        .ok_or_else(|| anyhow!("output path {utf8_path} has no file name"))?;
    let parent = utf8_path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    Dir::create_ambient_dir_all(parent, ambient_authority())
        .with_context(|| format!("failed to create directory {parent}"))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .with_context(|| format!("failed to open directory {parent}"))?;
    dir.write(file_name, content)
        .with_context(|| format!("failed to write {utf8_path}"))?;
    info!("Wrote Makefile to {utf8_path}");
    Ok(())
}

fn is_broken_pipe(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::BrokenPipe
}

fn write_all_ignoring_broken_pipe(writer: &mut impl Write, buf: &[u8]) -> io::Result<()> {
    match writer.write_all(buf) {
        Ok(()) => Ok(()),
        Err(err) if is_broken_pipe(&err) => Ok(()),
        Err(err) => Err(err),
    }
}

fn flush_ignoring_broken_pipe(writer: &mut impl Write) -> io::Result<()> {
    match writer.flush() {
        Ok(()) => Ok(()),
        Err(err) if is_broken_pipe(&err) => Ok(()),
        Err(err) => Err(err),
    }
}

/// Print the Makefile text; a closed pipe (e.g. `| head`) is not an error.
///
/// # Errors
///
/// Returns an error for write failures other than a broken pipe.
pub fn write_stdout(content: &str) -> AnyResult<()> {
    let mut stdout = io::stdout().lock();
    write_all_ignoring_broken_pipe(&mut stdout, content.as_bytes())
        .context("failed to write Makefile to stdout")?;
    flush_ignoring_broken_pipe(&mut stdout).context("failed to flush stdout")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn dash_means_stdout() {
        assert!(is_stdout_path(Path::new("-")));
        assert!(!is_stdout_path(Path::new("Makefile")));
    }

    #[test]
    fn broken_pipe_is_ignored() {
        let mut writer = BrokenPipe;
        assert!(write_all_ignoring_broken_pipe(&mut writer, b"all::\n").is_ok());
        assert!(flush_ignoring_broken_pipe(&mut writer).is_ok());
    }

    #[test]
    fn write_makefile_replaces_existing_file() -> AnyResult<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("Makefile");
        fs::write(&path, "old::\n\tstale\n")?;
        write_makefile(&path, "all::\n")?;
        assert_eq!(fs::read_to_string(&path)?, "all::\n");
        Ok(())
    }

    #[test]
    fn path_without_file_name_is_an_error() {
        assert!(write_makefile(Path::new("/"), "all::\n").is_err());
    }

    #[test]
    fn write_makefile_creates_parent_directories() -> AnyResult<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("nested/out/Makefile");
        write_makefile(&path, "all::\n")?;
        assert_eq!(fs::read_to_string(&path)?, "all::\n");
        Ok(())
    }
}
