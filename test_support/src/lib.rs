//! Test utilities shared by the integration suites.
//!
//! Helpers here lay out throwaway project directories and drive the real
//! `make` binary against generated Makefiles.

pub mod make;

pub use make::{make_available, make_dry_run};

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use tempfile::TempDir;

/// A temporary project directory with UTF-8 paths.
pub struct Project {
    _temp: TempDir,
    root: Utf8PathBuf,
    dir: Dir,
}

impl Project {
    /// Create an empty project directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or its path is
    /// not UTF-8.
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("create project dir")?;
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .map_err(|path| anyhow!("non UTF-8 temp dir {}", path.display()))?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())
            .with_context(|| format!("open {root}"))?;
        Ok(Self {
            _temp: temp,
            root,
            dir,
        })
    }

    /// Absolute path of the project root.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write `contents` to `name` below the root, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if any filesystem operation fails.
    pub fn write(&self, name: &str, contents: &str) -> Result<()> {
        if let Some(parent) = Utf8Path::new(name)
            .parent()
            .filter(|p| !p.as_str().is_empty())
        {
            self.dir
                .create_dir_all(parent)
                .with_context(|| format!("create {parent}"))?;
        }
        self.dir
            .write(name, contents)
            .with_context(|| format!("write {name}"))
    }

    /// Read `name` below the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(&self, name: &str) -> Result<String> {
        self.dir
            .read_to_string(name)
            .with_context(|| format!("read {name}"))
    }

    /// Whether `name` exists below the root.
    pub fn exists(&self, name: &str) -> bool {
        self.dir.exists(name)
    }
}
