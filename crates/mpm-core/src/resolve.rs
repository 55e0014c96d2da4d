//! Library installation against the remote catalog.
//!
//! Installation is transactional with respect to the manifest: the
//! dependency map is written only after the library's sources are on
//! disk, so `platform.json` never records a clone that failed.

use crate::git::{GitClient, GitError};
use crate::makefile::{Makefile, MakefileError};
use crate::manifest::{Manifest, ManifestError};
use crate::project::ProjectLayout;
use crate::registry::{Registry, RegistryClient, RegistryError};
use crate::toolchain::{Toolchain, ToolchainError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during installation.
#[derive(Error, Debug)]
pub enum InstallError {
    /// The registry could not be consulted at all.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The catalog was fetched fine but does not list the library.
    #[error("library '{0}' not found in the registry")]
    NotFound(String),

    #[error("{0}")]
    Toolchain(#[from] ToolchainError),

    /// `lib/<name>` is occupied by something that is not a directory.
    #[error("cannot install '{name}': '{}' exists and is not a directory", .path.display())]
    Obstructed { name: String, path: PathBuf },

    #[error("git error: {0}")]
    Git(#[from] GitError),

    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("makefile error: {0}")]
    Makefile(#[from] MakefileError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How an installation concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Sources were cloned and the manifest updated.
    Installed { name: String, version: String },

    /// Sources were already on disk; only the recorded version was
    /// refreshed to the catalog's current pin.
    AlreadyInstalled { name: String, version: String },
}

impl InstallOutcome {
    /// The library name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Installed { name, .. } | Self::AlreadyInstalled { name, .. } => name,
        }
    }

    /// The version recorded in the manifest.
    #[must_use]
    pub fn version(&self) -> &str {
        match self {
            Self::Installed { version, .. } | Self::AlreadyInstalled { version, .. } => version,
        }
    }
}

/// Installs libraries into one project.
///
/// Talks to git through the [`GitClient`] seam so the whole flow can be
/// exercised without a network.
pub struct Installer<'a> {
    layout: &'a ProjectLayout,
    git: &'a dyn GitClient,
}

impl<'a> Installer<'a> {
    /// Creates an installer for the given project.
    #[must_use]
    pub fn new(layout: &'a ProjectLayout, git: &'a dyn GitClient) -> Self {
        Self { layout, git }
    }

    /// Fetches the current catalog and installs `name` from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be consulted or the
    /// installation itself fails; see [`Installer::install_from`].
    pub fn install(
        &self,
        registry: &RegistryClient,
        name: &str,
    ) -> Result<InstallOutcome, InstallError> {
        let catalog = registry.fetch()?;
        self.install_from(name, &catalog)
    }

    /// Installs `name` from an already fetched catalog.
    ///
    /// Verifies that the manifest matches the disk and names a supported
    /// platform, looks the library up, clones it at the pinned ref unless
    /// its directory already exists, records the pin in the manifest, and
    /// regenerates the Makefile. Repeating an install is a no-op apart
    /// from refreshing the recorded version to the catalog's current pin.
    ///
    /// # Errors
    ///
    /// Returns an error if the project state is corrupt, the platform is
    /// unsupported, the library is not catalogued, its path is occupied
    /// by a non-directory, or the clone fails. None of these mutate the
    /// manifest or the Makefile.
    pub fn install_from(
        &self,
        name: &str,
        catalog: &Registry,
    ) -> Result<InstallOutcome, InstallError> {
        let mut manifest = Manifest::load(&self.layout.manifest_path)?;
        manifest.verify_installed(&self.layout.lib_dir)?;

        // Regeneration parses the platform last; check it up front so an
        // unsupported platform aborts before the clone and the manifest
        // write.
        manifest.platform.parse::<Toolchain>()?;

        let entry = catalog
            .get(name)
            .ok_or_else(|| InstallError::NotFound(name.to_string()))?;

        let dest = self.layout.lib_dir.join(name);
        // Only a directory at lib/<name> counts as installed.
        let cloned = if dest.is_dir() {
            false
        } else if dest.exists() {
            return Err(InstallError::Obstructed {
                name: name.to_string(),
                path: dest,
            });
        } else {
            std::fs::create_dir_all(&self.layout.lib_dir)?;
            self.git.clone_at(&entry.source, &entry.version, &dest)?;
            true
        };

        // Last write wins: the recorded version follows the catalog's
        // current pin even when the sources were already on disk.
        manifest
            .dependencies
            .insert(name.to_string(), entry.version.clone());
        manifest.save(&self.layout.manifest_path)?;

        Makefile::discover(self.layout, &manifest)?.write(self.layout)?;

        let outcome = if cloned {
            InstallOutcome::Installed {
                name: name.to_string(),
                version: entry.version.clone(),
            }
        } else {
            InstallOutcome::AlreadyInstalled {
                name: name.to_string(),
                version: entry.version.clone(),
            }
        };
        Ok(outcome)
    }
}
