//! Project manifest (`platform.json`) parsing and persistence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors that can occur when working with manifests.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("manifest records library '{name}' but '{}' does not exist on disk", .path.display())]
    MissingLibraryDir {
        name: String,
        path: std::path::PathBuf,
    },
}

/// The complete `platform.json` manifest.
///
/// Every field carries a serde default so a hand-trimmed document still
/// loads; [`Manifest::save`] always writes the full field set back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Project name, also the name of the linked binary.
    #[serde(default)]
    pub name: String,

    /// Target platform, stored as the compiler executable name.
    #[serde(default)]
    pub platform: String,

    /// Installed libraries, name to pinned git ref.
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

impl Manifest {
    /// Creates a manifest with no dependencies.
    #[must_use]
    pub fn new(name: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platform: platform.into(),
            dependencies: BTreeMap::new(),
        }
    }

    /// Loads a manifest from a file path.
    ///
    /// An absent file is the valid uninitialized state and yields the
    /// default (empty) manifest. Anything else that keeps the file from
    /// being read or parsed is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ManifestError::Io(e)),
        };
        Self::parse(&content)
    }

    /// Parses a manifest from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Writes the manifest to `path`, replacing any previous content.
    ///
    /// The document is serialized into a temporary file in the target
    /// directory and renamed over the destination, so a reader never
    /// observes a half-written manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination is not writable.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ManifestError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        file.persist(path).map_err(|e| ManifestError::Io(e.error))?;
        Ok(())
    }

    /// Checks that every recorded dependency has a directory under
    /// `lib_dir`.
    ///
    /// A missing directory means the manifest and the disk have diverged;
    /// the mismatch is reported, never silently repaired. Directories
    /// under `lib_dir` without a manifest entry are not a violation.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first dependency whose directory is
    /// missing.
    pub fn verify_installed(&self, lib_dir: &Path) -> Result<(), ManifestError> {
        for name in self.dependencies.keys() {
            let path = lib_dir.join(name);
            if !path.is_dir() {
                return Err(ManifestError::MissingLibraryDir {
                    name: name.clone(),
                    path,
                });
            }
        }
        Ok(())
    }
}
