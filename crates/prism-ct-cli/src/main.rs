//! prism-ct command-line verifier
//!
//! `verify` runs one verification pass over DER certificate files and
//! prints the resulting domain verification as JSON. `ledger` reads one
//! log's account from the Prism ledger and reports whether it is
//! consistent with the ledger commitment.

use clap::{Parser, Subcommand};
use prism_ct::ct_log::LogRegistry;
use prism_ct::ledger::DEFAULT_PRISM_URL;
use prism_ct::verifier::LedgerConsistency;
use prism_ct::{http_orchestrator, verify_chain, DomainVerificationStore, Verdict, VerifierConfig};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "prism-ct", version, about = "Verify certificates against CT logs and the Prism ledger")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify a certificate chain served for an origin
    Verify {
        /// CT log list JSON (v3 format)
        #[arg(long, env = "PRISM_CT_LOG_LIST")]
        log_list: PathBuf,

        /// Base URL of the Prism node
        #[arg(long, env = "PRISM_URL", default_value = DEFAULT_PRISM_URL)]
        prism_url: String,

        /// URL the chain was served for
        #[arg(long)]
        origin: String,

        /// Verifier configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,

        /// DER certificates, leaf first then its issuer
        #[arg(required = true, num_args = 2..)]
        chain: Vec<PathBuf>,
    },

    /// Check a CT log's account on the Prism ledger
    Ledger {
        /// Base URL of the Prism node
        #[arg(long, env = "PRISM_URL", default_value = DEFAULT_PRISM_URL)]
        prism_url: String,

        /// Base64 log ID of the CT log
        #[arg(long)]
        log_id: String,

        /// Verifier configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Verify {
            log_list,
            prism_url,
            origin,
            config,
            chain,
        } => verify(&log_list, &prism_url, &origin, config.as_deref(), &chain).await,
        Command::Ledger {
            prism_url,
            log_id,
            config,
        } => ledger(&prism_url, &log_id, config.as_deref()).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<VerifierConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(VerifierConfig::from_file(path)?),
        None => Ok(VerifierConfig::default()),
    }
}

async fn verify(
    log_list: &Path,
    prism_url: &str,
    origin: &str,
    config: Option<&Path>,
    chain: &[PathBuf],
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let registry = LogRegistry::from_file(log_list)?;
    tracing::info!(logs = registry.len(), "loaded log list");

    let chain = chain
        .iter()
        .map(|path| {
            std::fs::read(path).map_err(|e| format!("failed to read {}: {}", path.display(), e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let orchestrator =
        http_orchestrator(registry, prism_url, config, DomainVerificationStore::new())?;
    let report = verify_chain(&orchestrator, origin, chain).await?;

    println!("{}", serde_json::to_string_pretty(&report.verification)?);

    Ok(match report.verification.verdict {
        Verdict::Valid => ExitCode::SUCCESS,
        Verdict::NotVerifiable => ExitCode::from(2),
        Verdict::Invalid | Verdict::Pending => ExitCode::from(1),
    })
}

async fn ledger(
    prism_url: &str,
    log_id: &str,
    config: Option<&Path>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let orchestrator = http_orchestrator(
        LogRegistry::default(),
        prism_url,
        config,
        DomainVerificationStore::new(),
    )?;

    let read = orchestrator.read_ledger(log_id).await;
    let snapshot = read.snapshot().map(|s| {
        json!({
            "treeSize": s.tree_size,
            "rootHash": s.root_hash.to_base64(),
        })
    });

    let output = json!({
        "logId": log_id,
        "consistency": read.consistency,
        "commitment": read.commitment.map(|c| c.to_string()),
        "nonce": read.account.as_ref().map(|a| a.account.nonce),
        "snapshot": snapshot,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(if read.consistency == LedgerConsistency::Verified {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
