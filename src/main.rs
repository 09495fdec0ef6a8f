//! primp-mcp - MCP server for HTTP requests with browser impersonation
//!
//! This binary serves the `primp_request` and `primp_upload` tools over
//! stdio to MCP clients.

use std::fs::File;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use primp_mcp::{McpServer, ReqwestTransport};

/// MCP server for HTTP requests with browser impersonation.
#[derive(Parser, Debug)]
#[command(name = "primp-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run in stdio mode (standard MCP transport).
    #[arg(long, default_value = "true")]
    stdio: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Log output file (default: stderr).
    #[arg(long)]
    log_file: Option<String>,

    /// Connect-phase timeout in seconds, bounded by each call's own timeout.
    #[arg(long)]
    connect_timeout: Option<f64>,
}

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout carries the protocol; logs go to stderr or a file
    match &args.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to open log file {}", path))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

fn transport(args: &Args) -> anyhow::Result<ReqwestTransport> {
    let transport = ReqwestTransport::new();
    match args.connect_timeout {
        Some(secs) => {
            let timeout = Duration::try_from_secs_f64(secs)
                .context("--connect-timeout must be a non-negative number of seconds")?;
            Ok(transport.with_connect_timeout(timeout))
        }
        None => Ok(transport),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!(
        "Starting {} v{}",
        primp_mcp::server::SERVER_NAME,
        primp_mcp::server::SERVER_VERSION
    );

    let transport = match transport(&args) {
        Ok(transport) => transport,
        Err(e) => {
            tracing::error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let server = McpServer::new(Arc::new(transport));

    if args.stdio {
        match server.run_stdio().await {
            Ok(()) => {
                tracing::info!("Server exited cleanly");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("Server error: {}", e);
                ExitCode::FAILURE
            }
        }
    } else {
        tracing::error!("Only stdio mode is currently supported");
        ExitCode::FAILURE
    }
}
