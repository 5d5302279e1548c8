//! Network fee estimator CLI
//!
//! Resolves the user-facing network fee for a transaction:
//! - Fee basis from the transaction (classic gas price or EIP-1559 fees)
//! - Fast-tier fallback when the transaction carries no basis
//! - Confirmation time from exactly matching EIP-1559 tiers
//! - Fiat value from the chain's native asset price

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use netfee_chain::{GasFeeEstimator, NetworkFeeEstimator, StaticChainSource};
use netfee_core::{
    ApproxDurationFormatter, ChainId, ChainRegistry, EstimatorConfig, FeeDisplay,
    LocaleCurrencyFormatter, Transaction,
};

/// Resolve the network fee of a transaction.
#[derive(Debug, Parser)]
#[command(name = "netfee", version)]
struct Args {
    /// Transaction JSON file (camelCase fields, string quantities)
    transaction: PathBuf,

    /// Chain ID; defaults to the configured default chain
    chain_id: Option<u64>,

    /// Chain registry: a TOML file or a directory of TOML files
    #[arg(long, env = "NETFEE_CHAINS", default_value = "config/chains.toml")]
    chains: PathBuf,

    /// Gas buffer in basis points (e.g., 1000 = +10%)
    #[arg(long, env = "NETFEE_GAS_BUFFER_BPS", default_value_t = 0)]
    gas_buffer_bps: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,netfee_core=debug,netfee_chain=debug")),
        )
        .init();

    let config = EstimatorConfig::load().context("loading estimator config")?;
    config.log_config();

    let chain = ChainId(args.chain_id.unwrap_or(config.default_chain));
    let tx = load_transaction(&args.transaction)?;

    let registry = ChainRegistry::load(&args.chains)?;
    let source = Arc::new(StaticChainSource::new(registry));

    let estimator = NetworkFeeEstimator::with_cache_config(
        source.clone(),
        Arc::new(GasFeeEstimator::new().with_gas_buffer_bps(args.gas_buffer_bps)),
        source,
        &config.cache,
    );

    info!(chain = %chain, from = %tx.from, "Resolving network fee");
    let currency = LocaleCurrencyFormatter::new(&config.display.currency, &config.display.locale);
    let mut display = estimator
        .fee_display(chain, &tx, &ApproxDurationFormatter, &currency)
        .await?;
    if !config.display.show_label {
        display = display.without_label();
    }

    match &display {
        FeeDisplay::Unavailable => warn!(chain = %chain, "Fiat value unknown, fee hidden"),
        _ => println!("{display}"),
    }

    Ok(())
}

fn load_transaction(path: &Path) -> Result<Transaction> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading transaction {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing transaction {}", path.display()))
}
