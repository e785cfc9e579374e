//! plugpack CLI - Plugin build planner
//!
//! Commands:
//! - `plugpack plan` - Print the plugin build configuration derived from a base configuration
//! - `plugpack check` - Validate a build options file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod check;
mod logging;
mod plan;

#[derive(Parser)]
#[command(name = "plugpack")]
#[command(author, version, about = "Plugin package build planner", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the transformed build configuration as JSON
    Plan {
        /// Build options file (.json or .toml)
        #[arg(short, long)]
        options: PathBuf,

        /// Base configuration JSON file
        #[arg(short, long)]
        base: PathBuf,

        /// Workspace root (default: current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Write the configuration to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Validate a build options file
    Check {
        /// Build options file (.json or .toml)
        #[arg(short, long)]
        options: PathBuf,

        /// Plugin manifest.json to validate alongside the options
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Plan {
            options,
            base,
            root,
            out,
        } => {
            plan::run(&options, &base, root, out)?;
        }
        Commands::Check { options, manifest } => {
            check::run(&options, manifest.as_deref())?;
        }
    }

    Ok(())
}
