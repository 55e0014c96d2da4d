//! Project scaffolding and dependency management for microcontroller C
//! projects.
//!
//! This crate provides:
//! - Parsing and persistence of `platform.json` manifests
//! - Project layout discovery and scaffolding (dev/, lib/, build/)
//! - Library installation from the remote registry via git
//! - Makefile generation from on-disk project state

mod git;
mod makefile;
mod manifest;
mod project;
mod registry;
mod resolve;
mod toolchain;

pub use git::{GitCli, GitClient, GitError};
pub use makefile::{Makefile, MakefileError, MAKEFILE_FILE};
pub use manifest::{Manifest, ManifestError};
pub use project::{
    init_project, InitError, ProjectError, ProjectLayout, BIN_DIR, BUILD_DIR, DEV_DIR,
    INCLUDE_DIR, LIB_DIR, MAIN_FILE, MANIFEST_FILE, OBJECT_DIR, SOURCE_DIR, SOURCE_EXT,
};
pub use registry::{
    LibraryEntry, Registry, RegistryClient, RegistryConfig, RegistryError, DEFAULT_REGISTRY_URL,
    REGISTRY_URL_ENV,
};
pub use resolve::{InstallError, InstallOutcome, Installer};
pub use toolchain::{Toolchain, ToolchainError};

/// Crate version, surfaced by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
