//! Grove CLI - Command-line interface for Grove
//!
//! This is the main entry point for users interacting with Grove.
//! It provides commands for indexing, querying, and serving the code graph.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "grove")]
#[command(author = "Grove Contributors")]
#[command(version)]
#[command(about = "In-memory knowledge graph for Java codebases", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize Grove in the current directory
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Index the codebase and build the graph
    Index {
        /// Path to index (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output file for the graph JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Find types near a type, by bare name
    Related {
        /// Simple type name
        name: String,

        /// Maximum hops (defaults to the configured max_depth)
        #[arg(short, long)]
        depth: Option<usize>,

        /// Project root (defaults to current directory)
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// List the methods of a type
    Members {
        /// Simple name of the owning type
        owner: String,

        /// Package of the owning type (empty for the default package)
        #[arg(short, long, default_value = "")]
        namespace: String,

        /// Project root (defaults to current directory)
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Show methods and related types for one type
    Context {
        /// Simple type name
        name: String,

        /// Package of the type (empty for the default package)
        #[arg(short, long, default_value = "")]
        namespace: String,

        /// Maximum hops (defaults to the configured max_depth)
        #[arg(short, long)]
        depth: Option<usize>,

        /// Project root (defaults to current directory)
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Show index status and statistics
    Status {
        /// Path to check (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Run a legacy pattern query
    Query {
        /// Query text
        query: String,

        /// Project root (defaults to current directory)
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },

    /// Start the Grove server
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(long)]
        port: Option<u16>,

        /// Headless mode: bind to 0.0.0.0 for remote access
        #[arg(long)]
        headless: bool,

        /// Path to index (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();

    let result = match cli.command {
        Commands::Init { path } => commands::init(&path),
        Commands::Index { path, output } => commands::index(&path, output.as_deref()),
        Commands::Related {
            name,
            depth,
            path,
            json,
        } => commands::related(&name, depth, &path, json),
        Commands::Members {
            owner,
            namespace,
            path,
            json,
        } => commands::members(&owner, &namespace, &path, json),
        Commands::Context {
            name,
            namespace,
            depth,
            path,
            json,
        } => commands::context(&name, &namespace, depth, &path, json),
        Commands::Status { path } => commands::status(&path),
        Commands::Query { query, path } => commands::query(&query, &path),
        Commands::Serve {
            port,
            headless,
            path,
        } => commands::serve(port, headless, &path).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
