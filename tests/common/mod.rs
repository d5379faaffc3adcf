//! Shared helpers for driving the `meshcell` binary in integration tests.

#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch project directory the binary runs in.
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    project_dir: PathBuf,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        fs::create_dir_all(&project_dir)?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    pub fn path(&self) -> &Path {
        &self.project_dir
    }

    /// Default output directory of the binary, relative to the project.
    pub fn default_output_dir(&self) -> PathBuf {
        self.project_dir.join("target").join("meshcell")
    }

    /// Write `content` to `name` inside the project and return the full path.
    pub fn write_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.project_dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = self.project_dir.join(path);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// The binary, running in the project directory with a clean environment.
    pub fn meshcell_command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_meshcell"));
        cmd.current_dir(&self.project_dir)
            .env_remove("MESHCELL_CONFIG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}

/// File assertion helpers
pub struct FileAssert;

impl FileAssert {
    pub fn exists(path: impl AsRef<Path>) {
        let path = path.as_ref();
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }

    pub fn not_exists(path: impl AsRef<Path>) {
        let path = path.as_ref();
        assert!(!path.exists(), "Expected file to not exist: {}", path.display());
    }

    pub fn contains(path: impl AsRef<Path>, needle: &str) {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));
        assert!(
            content.contains(needle),
            "Expected {} to contain '{}'\nActual content:\n{}",
            path.display(),
            needle,
            content
        );
    }
}
