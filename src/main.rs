use anyhow::Result;
use clap::{Parser, Subcommand};
use stale_scope::app::dto::ReductionKind;
use stale_scope::app::engine::StaleEngine;
use stale_scope::cli;
use stale_scope::domain::session::ResolverConfig;
use stale_scope::server::{http, mcp::StaleMcpServer};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// stale-scope: compute the stale set across a multi-project workspace
#[derive(Parser)]
#[command(name = "stale-scope", version, about, long_about = None)]
struct Cli {
    /// Path to the workspace snapshot (JSON)
    snapshot: PathBuf,

    /// Abort a collection run nested deeper than this
    #[arg(long)]
    max_depth: Option<usize>,

    /// Accept project reference cycles in the snapshot
    #[arg(long)]
    allow_reference_cycles: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute stale dependencies for changed and removed artifacts
    Collect {
        /// Project the build was requested for
        #[arg(short, long)]
        reference: String,

        /// Added or changed artifacts as name#kind
        #[arg(short, long, num_args = 1..)]
        changed: Vec<String>,

        /// Removed artifacts as name#kind
        #[arg(long, num_args = 1..)]
        removed: Vec<String>,

        #[arg(long, value_enum, default_value_t = ReductionKind::Standard)]
        reduction: ReductionKind,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List projects and their references
    Projects,
    /// Search artifact identities by regex
    Search {
        pattern: String,

        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1:8118")]
        bind: SocketAddr,
    },
    /// Serve MCP over stdio
    Mcp,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is reserved for command output and the MCP transport
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stale_scope=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ResolverConfig {
        max_depth: cli.max_depth,
    };
    let engine = StaleEngine::load_from_json(&cli.snapshot, cli.allow_reference_cycles, config)?;

    match cli.command {
        Commands::Collect {
            reference,
            changed,
            removed,
            reduction,
            json,
        } => cli::collect_and_display(&engine, &reference, &changed, &removed, reduction, json)?,
        Commands::Projects => cli::list_projects(&engine)?,
        Commands::Search { pattern, limit } => cli::search_identities(&engine, &pattern, limit)?,
        Commands::Serve { bind } => http::serve(engine, bind).await?,
        Commands::Mcp => StaleMcpServer::new(engine).serve_stdio().await?,
    }

    Ok(())
}
