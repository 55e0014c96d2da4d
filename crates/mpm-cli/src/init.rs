//! Project scaffolding for `mpm init`.

use anyhow::{bail, Context, Result};
use mpm_core::Toolchain;
use std::env;
use std::path::Path;

/// Scaffolds `./<name>` under the current directory.
pub fn run(name: &str, platform: Option<&str>) -> Result<()> {
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    run_at(&current_dir, name, platform)
}

/// Scaffolds `parent/<name>` as a new project.
pub fn run_at(parent: &Path, name: &str, platform: Option<&str>) -> Result<()> {
    validate_project_name(name)?;

    // Resolve the platform up front so the failure message arrives before
    // any directory is created, and so the success message can name it.
    let toolchain = match platform {
        Some(p) => p.parse::<Toolchain>()?,
        None => Toolchain::host_default()?,
    };

    let root = parent.join(name);
    mpm_core::init_project(&root, name, Some(toolchain.compiler()))?;

    println!("Created `{}` project for {}", name, toolchain);
    Ok(())
}

/// Validates a project name.
fn validate_project_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Project name cannot be empty");
    }

    if name.len() > 64 {
        bail!("Project name cannot exceed 64 characters");
    }

    // Must start with a letter
    let first = name.chars().next().unwrap();
    if !first.is_ascii_alphabetic() {
        bail!("Project name must start with a letter");
    }

    // Only alphanumeric, hyphens, and underscores
    for c in name.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' && c != '_' {
            bail!("Project name can only contain letters, numbers, hyphens, and underscores");
        }
    }

    Ok(())
}
