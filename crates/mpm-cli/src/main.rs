//! mpm - package manager and project scaffold for microcontroller C projects.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod build;
mod init;
mod install;

#[derive(Parser)]
#[command(name = "mpm")]
#[command(version = mpm_core::VERSION)]
#[command(about = "Package manager for microcontroller C projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project directory with the standard layout
    Init {
        /// Project name, also used as the directory name
        name: String,

        /// Target platform compiler (defaults to the host's)
        platform: Option<String>,
    },

    /// Install a library from the registry and relink the project
    #[command(
        long_about = "Install a library from the registry and relink the project.\n\n\
                      Clones the library's pinned ref into lib/ and records it in\n\
                      platform.json, then regenerates the Makefile from scratch.\n\
                      Manual edits to the Makefile do not survive this."
    )]
    Install {
        /// Library name as listed in the registry
        library: String,
    },

    /// Compile the project by running make
    Build,

    /// Deploy the built binary to a target device
    Deploy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { name, platform } => init::run(&name, platform.as_deref())?,
        Commands::Install { library } => install::run(&library)?,
        Commands::Build => build::run()?,
        Commands::Deploy => {
            println!("Deployment is not implemented yet.");
        }
    }

    Ok(())
}
