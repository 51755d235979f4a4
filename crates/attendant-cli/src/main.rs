mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, position::PositionSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "attendant",
    about = "Reconcile event positions: reuse, reactivate or create them from a list of names",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .attendant/ or .git/)
    #[arg(long, global = true, env = "ATTENDANT_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize .attendant/ in the current project
    Init,

    /// Reconcile a list of position names against an event
    Reconcile {
        /// Event id
        #[arg(long)]
        event: String,

        /// Read names from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,

        /// Area for every position in the batch
        #[arg(long)]
        area: Option<String>,

        /// Print the planned decisions without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// List and bulk-create positions
    Position {
        #[command(subcommand)]
        subcommand: PositionSubcommand,
    },

    /// Show or validate the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Run the positions JSON API
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3141")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Reconcile {
            event,
            file,
            area,
            dry_run,
        } => cmd::reconcile::run(
            &root,
            cmd::reconcile::ReconcileArgs {
                event,
                file,
                area,
                dry_run,
            },
            cli.json,
        ),
        Commands::Position { subcommand } => cmd::position::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Serve { port } => cmd::serve::run(&root, port),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
