//! GATEHOUSE CLI
//!
//! Validate route tables and check sessions against them.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod commands;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gatehouse")]
#[command(about = "GATEHOUSE - route guard checker", long_about = None)]
struct Cli {
    /// Log guard decisions at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a route table and report configuration errors
    Validate {
        /// Route table JSON
        #[arg(short, long)]
        routes: PathBuf,
    },
    /// Decide what the router does for a path
    Check {
        /// Route table JSON
        #[arg(short, long)]
        routes: PathBuf,
        /// Session snapshot JSON
        #[arg(short, long)]
        session: PathBuf,
        /// Path to navigate to
        #[arg(short, long)]
        path: String,
    },
    /// Show every guard consulted for a path
    Explain {
        /// Route table JSON
        #[arg(short, long)]
        routes: PathBuf,
        /// Session snapshot JSON
        #[arg(short, long)]
        session: PathBuf,
        /// Path to navigate to
        #[arg(short, long)]
        path: String,
    },
    /// List routes the session may enter
    Menu {
        /// Route table JSON
        #[arg(short, long)]
        routes: PathBuf,
        /// Session snapshot JSON
        #[arg(short, long)]
        session: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "gatehouse=debug" } else { "gatehouse=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = match cli.command {
        Commands::Validate { routes } => commands::validate(&routes)?,
        Commands::Check {
            routes,
            session,
            path,
        } => commands::check(&routes, &session, &path).await?,
        Commands::Explain {
            routes,
            session,
            path,
        } => commands::explain(&routes, &session, &path).await?,
        Commands::Menu { routes, session } => commands::menu(&routes, &session).await?,
    };

    println!("{output}");
    Ok(())
}
