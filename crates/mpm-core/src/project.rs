//! Project structure, discovery, and scaffolding.
//!
//! The conventional layout of an mpm project:
//! ```text
//! my-project/
//! ├── platform.json         # Project manifest
//! ├── Makefile              # Generated build description
//! ├── dev/
//! │   ├── src/              # C sources (flat)
//! │   │   └── main.c
//! │   └── include/          # Project headers
//! ├── lib/                  # One directory per installed library
//! └── build/
//!     ├── obj/              # Object files
//!     └── bin/              # Linked binary
//! ```

use crate::makefile::{Makefile, MakefileError};
use crate::manifest::{Manifest, ManifestError};
use crate::toolchain::{Toolchain, ToolchainError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The manifest filename.
pub const MANIFEST_FILE: &str = "platform.json";

/// Directory holding project-owned code.
pub const DEV_DIR: &str = "dev";

/// Source directory, under [`DEV_DIR`].
pub const SOURCE_DIR: &str = "src";

/// Header directory, under [`DEV_DIR`].
pub const INCLUDE_DIR: &str = "include";

/// Directory holding installed libraries.
pub const LIB_DIR: &str = "lib";

/// Build output directory.
pub const BUILD_DIR: &str = "build";

/// Object file directory, under [`BUILD_DIR`].
pub const OBJECT_DIR: &str = "obj";

/// Binary directory, under [`BUILD_DIR`].
pub const BIN_DIR: &str = "bin";

/// Source file extension.
pub const SOURCE_EXT: &str = "c";

/// Placeholder entry point filename.
pub const MAIN_FILE: &str = "main.c";

/// Placeholder written into a freshly created source directory.
const MAIN_TEMPLATE: &str = "#include <stdio.h>\n\nint main(void) {\n    printf(\"Hello, world!\\n\");\n    return 0;\n}\n";

/// Errors that can occur when locating or reading project structure.
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("no platform.json found in '{}' or any parent directory", .0.display())]
    NotAProject(PathBuf),

    #[error("file name '{}' is not valid UTF-8", .0.display())]
    NonUtf8Name(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when initializing a project.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("'{}' already contains platform.json, refusing to reinitialize", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("{0}")]
    Toolchain(#[from] ToolchainError),

    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("makefile error: {0}")]
    Makefile(#[from] MakefileError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolved paths of a project rooted at an explicit directory.
///
/// Every operation receives the project root through this type; nothing in
/// the crate consults the ambient current directory.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    /// Root directory of the project.
    pub root: PathBuf,

    /// Path to the manifest file.
    pub manifest_path: PathBuf,

    /// C source directory.
    pub src_dir: PathBuf,

    /// Project header directory.
    pub include_dir: PathBuf,

    /// Installed libraries, one subdirectory each.
    pub lib_dir: PathBuf,

    /// Object file output directory.
    pub obj_dir: PathBuf,

    /// Binary output directory.
    pub bin_dir: PathBuf,
}

impl ProjectLayout {
    /// Computes the layout for a project rooted at `root`.
    ///
    /// Pure path math; nothing is required to exist yet.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            manifest_path: root.join(MANIFEST_FILE),
            src_dir: root.join(DEV_DIR).join(SOURCE_DIR),
            include_dir: root.join(DEV_DIR).join(INCLUDE_DIR),
            lib_dir: root.join(LIB_DIR),
            obj_dir: root.join(BUILD_DIR).join(OBJECT_DIR),
            bin_dir: root.join(BUILD_DIR).join(BIN_DIR),
            root,
        }
    }

    /// Finds a project by searching upward from `start` for a manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if no manifest is found in the directory tree.
    pub fn find_root(start: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let mut current = start.as_ref().to_path_buf();

        loop {
            if current.join(MANIFEST_FILE).exists() {
                return Ok(Self::new(current));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(ProjectError::NotAProject(start.as_ref().to_path_buf())),
            }
        }
    }

    /// Enumerates `.c` source file names, lexicographically sorted.
    ///
    /// The listing is taken fresh from disk on every call, never cached.
    /// A missing source directory yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read or a listed
    /// entry's name is not valid UTF-8.
    pub fn source_files(&self) -> Result<Vec<String>, ProjectError> {
        list_names(&self.src_dir, |path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == SOURCE_EXT)
        })
    }

    /// Enumerates installed library names, lexicographically sorted.
    ///
    /// Anything that is a directory under `lib/` counts as installed,
    /// whether the manifest records it or not. A missing library directory
    /// yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read or a listed
    /// entry's name is not valid UTF-8.
    pub fn libraries(&self) -> Result<Vec<String>, ProjectError> {
        list_names(&self.lib_dir, |path| path.is_dir())
    }
}

fn list_names(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<String>, ProjectError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if keep(&path) {
            // A name the Makefile cannot spell is an error, not a gap in
            // the listing.
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                return Err(ProjectError::NonUtf8Name(path));
            };
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Scaffolds a new project at `root`.
///
/// The toolchain is resolved first (explicit `platform` string, or the
/// host default), so an unsupported platform aborts before anything is
/// written. Directory creation is idempotent and non-destructive; the
/// placeholder `main.c` is written only when the source directory was
/// created fresh by this call. Finishes by writing the initial manifest
/// and Makefile.
///
/// # Errors
///
/// Returns an error if the platform is unsupported, the root already
/// holds a manifest, or the layout cannot be written.
pub fn init_project(
    root: impl Into<PathBuf>,
    name: &str,
    platform: Option<&str>,
) -> Result<ProjectLayout, InitError> {
    let toolchain = match platform {
        Some(p) => p.parse::<Toolchain>()?,
        None => Toolchain::host_default()?,
    };

    let layout = ProjectLayout::new(root);
    if layout.manifest_path.exists() {
        return Err(InitError::AlreadyInitialized(layout.root.clone()));
    }

    let fresh_src = !layout.src_dir.exists();
    std::fs::create_dir_all(&layout.src_dir)?;
    std::fs::create_dir_all(&layout.include_dir)?;
    std::fs::create_dir_all(&layout.lib_dir)?;
    std::fs::create_dir_all(&layout.obj_dir)?;
    std::fs::create_dir_all(&layout.bin_dir)?;

    if fresh_src {
        std::fs::write(layout.src_dir.join(MAIN_FILE), MAIN_TEMPLATE)?;
    }

    let manifest = Manifest::new(name, toolchain.compiler());
    manifest.save(&layout.manifest_path)?;
    Makefile::discover(&layout, &manifest)?.write(&layout)?;

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn init_creates_layout_manifest_and_makefile() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("blinky");

        let layout = init_project(&root, "blinky", Some("gcc")).unwrap();

        assert!(layout.src_dir.join(MAIN_FILE).is_file());
        assert!(layout.include_dir.is_dir());
        assert!(layout.lib_dir.is_dir());
        assert!(layout.obj_dir.is_dir());
        assert!(layout.bin_dir.is_dir());
        assert!(root.join("Makefile").is_file());

        let manifest = Manifest::load(&layout.manifest_path).unwrap();
        assert_eq!(manifest.name, "blinky");
        assert_eq!(manifest.platform, "gcc");
        assert!(manifest.dependencies.is_empty());
    }

    #[test]
    fn init_twice_is_refused() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("blinky");

        init_project(&root, "blinky", Some("gcc")).unwrap();
        let err = init_project(&root, "blinky", Some("gcc")).unwrap_err();
        assert!(matches!(err, InitError::AlreadyInitialized(..)));
    }

    #[test]
    fn init_never_overwrites_existing_sources() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("blinky");
        let src = root.join(DEV_DIR).join(SOURCE_DIR);
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join(MAIN_FILE), "int main(void) { return 42; }\n").unwrap();

        init_project(&root, "blinky", Some("gcc")).unwrap();

        let content = fs::read_to_string(src.join(MAIN_FILE)).unwrap();
        assert_eq!(content, "int main(void) { return 42; }\n");
    }

    #[test]
    fn unsupported_platform_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("blinky");

        let err = init_project(&root, "blinky", Some("z80cc")).unwrap_err();
        assert!(matches!(
            err,
            InitError::Toolchain(ToolchainError::UnsupportedPlatform(..))
        ));
        assert!(!root.exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn default_platform_on_linux_is_gcc() {
        let tmp = TempDir::new().unwrap();
        let layout = init_project(tmp.path().join("blinky"), "blinky", None).unwrap();
        let manifest = Manifest::load(&layout.manifest_path).unwrap();
        assert_eq!(manifest.platform, "gcc");
    }

    #[test]
    fn source_files_are_sorted_and_filtered() {
        let tmp = TempDir::new().unwrap();
        let layout = init_project(tmp.path().join("proj"), "proj", Some("gcc")).unwrap();
        fs::write(layout.src_dir.join("uart.c"), "").unwrap();
        fs::write(layout.src_dir.join("adc.c"), "").unwrap();
        fs::write(layout.src_dir.join("notes.txt"), "").unwrap();
        fs::create_dir(layout.src_dir.join("ignored")).unwrap();

        let sources = layout.source_files().unwrap();
        assert_eq!(sources, ["adc.c", "main.c", "uart.c"]);
    }

    #[test]
    fn libraries_are_sorted_directories_only() {
        let tmp = TempDir::new().unwrap();
        let layout = init_project(tmp.path().join("proj"), "proj", Some("gcc")).unwrap();
        fs::create_dir(layout.lib_dir.join("zetalib")).unwrap();
        fs::create_dir(layout.lib_dir.join("alphalib")).unwrap();
        fs::write(layout.lib_dir.join("README"), "").unwrap();

        let libraries = layout.libraries().unwrap();
        assert_eq!(libraries, ["alphalib", "zetalib"]);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_source_name_is_an_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        let layout = init_project(tmp.path().join("proj"), "proj", Some("gcc")).unwrap();
        fs::write(layout.src_dir.join(OsStr::from_bytes(b"u\xFFart.c")), "").unwrap();

        let err = layout.source_files().unwrap_err();
        assert!(matches!(err, ProjectError::NonUtf8Name(..)));
    }

    #[test]
    fn missing_directories_enumerate_empty() {
        let layout = ProjectLayout::new("/nonexistent/project");
        assert!(layout.source_files().unwrap().is_empty());
        assert!(layout.libraries().unwrap().is_empty());
    }

    #[test]
    fn find_root_from_subdirectory() {
        let tmp = TempDir::new().unwrap();
        let layout = init_project(tmp.path().join("proj"), "proj", Some("gcc")).unwrap();

        let found = ProjectLayout::find_root(&layout.src_dir).unwrap();
        assert_eq!(found.root, layout.root);
    }

    #[test]
    fn find_root_outside_any_project_fails() {
        let tmp = TempDir::new().unwrap();
        let err = ProjectLayout::find_root(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotAProject(..)));
    }
}
