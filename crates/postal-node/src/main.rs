//! # Postal Node
//!
//! Replays a JSON-lines file of action requests against a fresh in-memory
//! contract state.
//!
//! ```text
//! postal-node --config node.toml requests.jsonl
//! postal-node --dump-state - < requests.jsonl
//! ```

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use postal_contract::{ContractConfig, InMemoryStateBackend, PostalContractService};
use postal_node::{replay, NodeConfig};
use postal_telemetry::init_logging;

#[derive(Debug, Parser)]
#[command(name = "postal-node", version, about = "Replay postal ledger actions")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use calendar-length days regardless of the config file
    #[arg(long)]
    production: bool,

    /// Print the final contract state as JSON after the replay
    #[arg(long)]
    dump_state: bool,

    /// JSON-lines request file, `-` for stdin
    input: PathBuf,
}

fn load_config(args: &Args) -> Result<NodeConfig> {
    let mut config = match &args.config {
        Some(path) => NodeConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => NodeConfig::default(),
    };
    if args.production {
        config.contract.day_length_secs = ContractConfig::production().day_length_secs;
    }
    let config = config
        .with_env_overrides()
        .context("Failed to apply environment overrides")?;
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    let _guard = init_logging(&config.telemetry).context("Failed to initialize logging")?;

    info!(
        day_length_secs = config.contract.day_length_secs,
        input = %args.input.display(),
        "Starting postal node"
    );

    let service = PostalContractService::new(InMemoryStateBackend::new(), config.contract)
        .context("Failed to create contract service")?;

    let stdout = io::stdout();
    let report = if args.input.as_os_str() == "-" {
        replay(&service, io::stdin().lock(), stdout.lock()).await?
    } else {
        let file = File::open(&args.input)
            .with_context(|| format!("Failed to open {}", args.input.display()))?;
        replay(&service, BufReader::new(file), stdout.lock()).await?
    };

    if args.dump_state {
        let snapshot = service.backend().snapshot();
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, &snapshot).context("Failed to dump state")?;
        writeln!(out)?;
    }

    let stats = service.stats().await;
    info!(
        executed = report.executed,
        rejected = report.rejected,
        writes_committed = stats.writes_committed,
        "Node finished"
    );

    Ok(())
}
