//! Main entry point for the Polymarket MCP server
//!
//! This file sets up logging, parses command line arguments, and starts the MCP server.
//! The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use polymarket_mcp::{FramingPolicy, PolymarketServer, ServerConfig};

/// File name of the market database inside the data directory
const DATABASE_FILE: &str = "polymarket.db";

/// Get the default database path with robust fallback strategy
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    // Try various locations in order of preference
    let potential_paths = [
        // 1. User's data directory (platform-specific)
        dirs::data_dir().map(|mut p| {
            p.push("polymarket-mcp");
            p
        }),
        // 2. User's home directory
        dirs::home_dir().map(|mut p| {
            p.push(".polymarket_mcp");
            p
        }),
        // 3. ./data next to where the server was started
        std::env::current_dir().ok().map(|mut p| {
            p.push("data");
            p
        }),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(potential_path).is_ok() {
            // Test if we can write to this directory
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file);
                return Ok(potential_path.join(DATABASE_FILE));
            }
        }
    }

    // Ultimate fallback: use a temporary directory
    let mut temp_path = std::env::temp_dir();
    temp_path.push("polymarket-mcp");
    std::fs::create_dir_all(&temp_path)?;
    temp_path.push(DATABASE_FILE);

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path)
}

/// Command line arguments for the Polymarket MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's data directory
    #[arg(long)]
    database: Option<PathBuf>,
    
    /// How stdin chunks are split into requests: per-chunk or reassemble
    #[arg(long, default_value_t = FramingPolicy::PerChunk)]
    framing: FramingPolicy,
    
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
    
    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    
    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };
    
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("polymarket_mcp={}", log_level).into()),
        )
        .with_writer(std::io::stderr) // Send logs to stderr, not stdout
        .init();
    
    info!("Starting Polymarket MCP server");
    
    let database_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };
    
    info!("Using database at: {}", database_path.display());
    
    let server = PolymarketServer::new(ServerConfig {
        database_path,
        framing: args.framing,
    })?;
    
    server.run().await?;
    
    info!("Polymarket MCP server shutdown complete");
    Ok(())
}
