//! sigex-cli entry point.
//!
//! Two command families: `config-hash` computes the canonical hash of a
//! layered YAML config (the same hash the daemon records alongside every
//! decision), and `run` drives the daemon's status/control surface over
//! HTTP.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sigex")]
#[command(about = "sigex signal-to-order pipeline CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a layered config hash and print canonical JSON.
    ConfigHash {
        /// Paths in merge order (base -> env -> engine -> risk -> ...)
        #[arg(required = true)]
        paths: Vec<String>,

        /// Also report keys the given mode (PAPER | LIVE) does not read.
        #[arg(long)]
        mode: Option<String>,
    },

    /// Daemon run-lifecycle commands.
    Run {
        #[command(subcommand)]
        cmd: RunCmd,

        /// Daemon base URL.
        #[arg(long, default_value = "http://127.0.0.1:8899")]
        addr: String,
    },
}

#[derive(Subcommand)]
enum RunCmd {
    /// Start a run (refused if the risk ledger's kill switch is tripped).
    Start,
    /// Stop the current run.
    Stop,
    /// Trip the kill switch and halt the current run.
    Halt,
    /// Print the daemon's current status snapshot.
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths, mode } => commands::config_hash::config_hash(paths, mode)?,
        Commands::Run { cmd, addr } => match cmd {
            RunCmd::Start => commands::run::run_start(&addr).await?,
            RunCmd::Stop => commands::run::run_stop(&addr).await?,
            RunCmd::Halt => commands::run::run_halt(&addr).await?,
            RunCmd::Status => commands::run::run_status(&addr).await?,
        },
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();
}
