//! Git collaborator, modeled at its interface boundary.

use std::path::Path;
use std::process::Command;
use thiserror::Error;

/// Errors that can occur when fetching library sources.
#[derive(Error, Debug)]
pub enum GitError {
    /// git itself could not be started.
    #[error("failed to run git: {0}, is git installed?")]
    Spawn(std::io::Error),

    /// git ran and exited unsuccessfully.
    #[error("git clone at ref '{reference}' failed: {stderr}")]
    CloneFailed { reference: String, stderr: String },
}

/// Fetches library sources from version control.
///
/// The resolver talks to this trait, so installation logic can be driven
/// in tests without a git binary or a network.
pub trait GitClient {
    /// Clones `source` at `reference` into `dest`.
    ///
    /// `dest` must not already contain files; git creates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the clone cannot be started or exits
    /// unsuccessfully.
    fn clone_at(&self, source: &str, reference: &str, dest: &Path) -> Result<(), GitError>;
}

/// [`GitClient`] backed by the system `git` binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl GitClient for GitCli {
    fn clone_at(&self, source: &str, reference: &str, dest: &Path) -> Result<(), GitError> {
        let output = Command::new("git")
            .arg("clone")
            .arg("--branch")
            .arg(reference)
            .arg(source)
            .arg(dest)
            .output()
            .map_err(GitError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(GitError::CloneFailed {
                reference: reference.to_string(),
                stderr,
            });
        }
        Ok(())
    }
}
