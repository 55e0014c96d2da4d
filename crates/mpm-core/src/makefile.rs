//! Makefile generation from on-disk project state.
//!
//! The build description is derived wholesale from the manifest and the
//! current directory listings and regenerated from scratch after every
//! dependency mutation, never patched in place. Manual edits do not
//! survive regeneration; the generated file says so in its header.

use crate::manifest::Manifest;
use crate::project::{
    ProjectError, ProjectLayout, BIN_DIR, BUILD_DIR, DEV_DIR, INCLUDE_DIR, LIB_DIR, OBJECT_DIR,
    SOURCE_DIR, SOURCE_EXT,
};
use crate::toolchain::{Toolchain, ToolchainError};
use thiserror::Error;

/// The generated build description filename.
pub const MAKEFILE_FILE: &str = "Makefile";

/// Binary name used when the manifest carries none.
const FALLBACK_BIN: &str = "main";

/// Errors that can occur when generating the build description.
#[derive(Error, Debug)]
pub enum MakefileError {
    #[error("{0}")]
    Toolchain(#[from] ToolchainError),

    #[error("project error: {0}")]
    Project(#[from] ProjectError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A build description derived from project state.
///
/// Holds plain listings so rendering stays a pure function;
/// [`Makefile::discover`] is the only constructor and the only part that
/// touches the filesystem.
#[derive(Debug, Clone)]
pub struct Makefile {
    compiler: &'static str,
    binary: String,
    sources: Vec<String>,
    libraries: Vec<String>,
}

impl Makefile {
    /// Derives the build description from the manifest and the current
    /// directory listings.
    ///
    /// The platform is parsed before anything else, so an unrecognized
    /// compiler aborts generation outright instead of producing a
    /// half-usable description.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform is unsupported or a directory
    /// listing fails.
    pub fn discover(layout: &ProjectLayout, manifest: &Manifest) -> Result<Self, MakefileError> {
        let toolchain: Toolchain = manifest.platform.parse()?;
        let sources = layout.source_files()?;
        let libraries = layout.libraries()?;
        let binary = if manifest.name.is_empty() {
            FALLBACK_BIN.to_string()
        } else {
            manifest.name.clone()
        };

        Ok(Self {
            compiler: toolchain.compiler(),
            binary,
            sources,
            libraries,
        })
    }

    /// Renders the Makefile text.
    ///
    /// Pure function of the discovered state: the same inputs render
    /// byte-identical text. Sources and libraries are already sorted by
    /// discovery, which is what keeps the rule and link order stable
    /// across runs.
    #[must_use]
    pub fn render(&self) -> String {
        let src_dir = format!("{DEV_DIR}/{SOURCE_DIR}");
        let include_dir = format!("{DEV_DIR}/{INCLUDE_DIR}");
        let obj_dir = format!("{BUILD_DIR}/{OBJECT_DIR}");
        let bin_dir = format!("{BUILD_DIR}/{BIN_DIR}");

        let objects: Vec<String> = self
            .sources
            .iter()
            .map(|source| {
                let stem = source.strip_suffix(&format!(".{SOURCE_EXT}")).unwrap_or(source);
                format!("{obj_dir}/{stem}.o")
            })
            .collect();

        let mut out = String::new();
        out.push_str(
            "# Generated by mpm. Regenerated on every install; manual edits will be lost.\n\n",
        );

        out.push_str(&format!("CC = {}\n", self.compiler));

        let mut cflags = format!("-Wall -Wextra -I{include_dir}");
        for lib in &self.libraries {
            cflags.push_str(&format!(" -I{LIB_DIR}/{lib}"));
        }
        out.push_str(&format!("CFLAGS = {cflags}\n"));

        out.push_str("LDFLAGS =");
        for lib in &self.libraries {
            out.push_str(&format!(" -L{LIB_DIR}/{lib}"));
        }
        out.push('\n');

        out.push_str("LDLIBS =");
        for lib in &self.libraries {
            out.push_str(&format!(" -l{lib}"));
        }
        out.push_str("\n\n");

        out.push_str(&format!("BIN = {bin_dir}/{}\n", self.binary));
        out.push_str(&format!("OBJS = {}\n\n", objects.join(" ")));

        out.push_str("all: $(BIN)\n\n");

        out.push_str("$(BIN): $(OBJS)\n");
        out.push_str(&format!("\t@mkdir -p {bin_dir}\n"));
        out.push_str("\t$(CC) $(LDFLAGS) -o $@ $(OBJS) $(LDLIBS)\n\n");

        for (object, source) in objects.iter().zip(&self.sources) {
            out.push_str(&format!("{object}: {src_dir}/{source}\n"));
            out.push_str(&format!("\t@mkdir -p {obj_dir}\n"));
            out.push_str("\t$(CC) $(CFLAGS) -c -o $@ $<\n\n");
        }

        out.push_str("clean:\n\trm -f $(OBJS) $(BIN)\n\n");
        out.push_str(".PHONY: all clean\n");
        out
    }

    /// Writes the rendered text to the project root, replacing any
    /// previous Makefile.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, layout: &ProjectLayout) -> Result<(), MakefileError> {
        std::fs::write(layout.root.join(MAKEFILE_FILE), self.render())?;
        Ok(())
    }
}
