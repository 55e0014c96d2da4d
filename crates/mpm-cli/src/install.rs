//! Library installation for `mpm install`.

use anyhow::{bail, Context, Result};
use mpm_core::{GitCli, InstallOutcome, Installer, ProjectLayout, RegistryClient};
use std::env;

/// Installs `library` into the project containing the current directory.
pub fn run(library: &str) -> Result<()> {
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let Ok(layout) = ProjectLayout::find_root(&current_dir) else {
        bail!("No platform.json found in this directory or any parent. Run `mpm init` first.");
    };

    let registry = RegistryClient::new()?;
    let outcome = Installer::new(&layout, &GitCli).install(&registry, library)?;

    match outcome {
        InstallOutcome::Installed { name, version } => {
            println!("Installed `{}` ({})", name, version);
        }
        InstallOutcome::AlreadyInstalled { name, version } => {
            println!("`{}` is already installed; recorded version {}", name, version);
        }
    }

    Ok(())
}
