//! JSON fixture files for loader tests.

use std::fs;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A temporary directory holding JSON fixtures, removed on drop.
#[derive(Debug)]
pub struct JsonFixtures {
    dir: TempDir,
}

impl JsonFixtures {
    /// Create an empty fixture directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or its path is not
    /// UTF-8.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create fixture directory")?;
        Utf8Path::from_path(dir.path()).context("fixture directory is not UTF-8")?;
        Ok(Self { dir })
    }

    /// Write `contents` to `name` inside the fixture directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, name: &str, contents: &str) -> Result<Utf8PathBuf> {
        let path = self.root()?.join(name);
        fs::write(&path, contents).with_context(|| format!("write fixture {path}"))?;
        Ok(path)
    }

    /// The fixture directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory path is not UTF-8.
    pub fn root(&self) -> Result<&Utf8Path> {
        Utf8Path::from_path(self.dir.path()).context("fixture directory is not UTF-8")
    }
}
