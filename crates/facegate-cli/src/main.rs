//! Facegate command-line interface.
//!
//! Role-based file access gated by facial recognition.
//!
//! # Quick Start
//!
//! ```bash
//! # Show the role hierarchy
//! facegate roles
//!
//! # Start an interactive session over a replay script
//! facegate run --script lobby.json
//!
//! # List enrolled identities
//! facegate identities
//! ```

mod commands;
mod style;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Facegate - role-based file access gated by facial recognition.
#[derive(Parser)]
#[command(name = "facegate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory holding facegate.toml and the identity store.
    #[arg(short = 'C', long, global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Start an interactive session (enroll, recognize, check access).
    Run {
        /// Replay script to use as camera and detector.
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Identity store file.
        #[arg(long)]
        store: Option<PathBuf>,

        /// Start with recognition on.
        #[arg(long)]
        active: bool,
    },

    /// Show the role hierarchy.
    Roles,

    /// List enrolled identities.
    Identities {
        /// Identity store file.
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Show the merged configuration.
    Config {
        /// Output format (text, toml).
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with prompts on stdout.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    style::set_no_color(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    match cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(())
        }
        Commands::Run {
            script,
            store,
            active,
        } => commands::run::run(
            &cli.project_dir,
            &commands::run::Overrides {
                script,
                store,
                active,
            },
        ),
        Commands::Roles => {
            commands::roles::run();
            Ok(())
        }
        Commands::Identities { store } => commands::identities::run(&cli.project_dir, store),
        Commands::Config { format } => commands::config::show(&cli.project_dir, &format),
    }
}
