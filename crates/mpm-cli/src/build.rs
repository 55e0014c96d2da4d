//! Build delegation for `mpm build`.

use anyhow::{bail, Context, Result};
use mpm_core::{Makefile, Manifest, ProjectLayout, MAKEFILE_FILE};
use std::env;
use std::process::Command;

/// Compiles the project containing the current directory by running make.
pub fn run() -> Result<()> {
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let Ok(layout) = ProjectLayout::find_root(&current_dir) else {
        bail!("No platform.json found in this directory or any parent. Run `mpm init` first.");
    };

    // Surface manifest/disk drift before handing off to make.
    let manifest = Manifest::load(&layout.manifest_path)?;
    manifest.verify_installed(&layout.lib_dir)?;

    // A deleted Makefile is re-derived from current state; it carries no
    // state of its own.
    if !layout.root.join(MAKEFILE_FILE).exists() {
        Makefile::discover(&layout, &manifest)?.write(&layout)?;
    }

    let status = Command::new("make")
        .current_dir(&layout.root)
        .status()
        .context("Failed to run make, is it installed?")?;

    if !status.success() {
        bail!("Build failed");
    }

    println!("Build complete");
    Ok(())
}
