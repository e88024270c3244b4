//! `funder` command line.
//!
//! ```text
//! funder.toml (+ FUNDER_PRIVATE_KEY for send and status)
//!     → config (load, env overrides, validate)
//!     → send:   FundingServiceProvider → FundingService
//!       prices: configured gas station
//!       status: RPC client + funder address
//! ```

use std::path::PathBuf;

use alloy::primitives::utils::{format_ether, parse_ether};
use clap::{Parser, Subcommand};
use serde_json::json;

use safe_funder::blockchain::{BlockReference, BlockchainClient, Wallet};
use safe_funder::config::load_or_default;
use safe_funder::funding::{FundingServiceProvider, SpendCeiling};
use safe_funder::gas_station::{build_gas_station, GasStation, GasTier, GWEI};
use safe_funder::observability::{logging, metrics};
use safe_funder::resilience::RetryPolicy;
use safe_funder::FundingRequest;

#[derive(Parser)]
#[command(name = "funder")]
#[command(about = "Funds new Safe wallets from a custodial funder account", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "funder.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send native currency from the funder account
    Send {
        /// Destination address (EIP-55 checksummed or single-case hex)
        #[arg(long)]
        to: String,
        /// Amount in ether, e.g. 0.01
        #[arg(long)]
        value: String,
        /// Gas price in gwei; an oracle tier when omitted
        #[arg(long, conflicts_with = "tier")]
        gas_price_gwei: Option<u64>,
        /// Oracle tier to pay (lowest, safe_low, standard, fast, fastest)
        #[arg(long)]
        tier: Option<GasTier>,
        /// Gas limit; the configured default when omitted
        #[arg(long)]
        gas_limit: Option<u64>,
        /// Retry nonce conflicts and transport errors per the configured policy
        #[arg(long)]
        retry: bool,
        /// Block reference for the nonce lookup (pending, latest or a number)
        #[arg(long)]
        block: Option<String>,
    },
    /// Print current gas price tiers
    Prices,
    /// Show funder address, balance, spend ceiling and RPC health
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(&cli.config)?;
    logging::init_logging(&config.observability)?;

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    match cli.command {
        Commands::Send {
            to,
            value,
            gas_price_gwei,
            tier,
            gas_limit,
            retry,
            block,
        } => {
            let value = parse_ether(&value)?;
            let block = match block {
                Some(b) => b.parse()?,
                None => config.funding.block_reference.parse::<BlockReference>()?,
            };
            let gas_limit = gas_limit.unwrap_or(config.funding.default_gas_limit);
            let retry_policy = RetryPolicy::from(&config.funding.retry);

            let provider = FundingServiceProvider::from_config(config);
            let service = provider.get_instance()?;

            let gas_price = match (gas_price_gwei, tier) {
                (Some(gwei), _) => Some(u128::from(gwei) * GWEI),
                (None, Some(tier)) => Some(service.gas_prices().await?.tier(tier)),
                (None, None) => None,
            };

            let mut request = FundingRequest::to(&to, value)?
                .with_gas_limit(gas_limit)
                .with_block(block);
            if let Some(price) = gas_price {
                request = request.with_gas_price(price);
            }
            if retry {
                request = request.with_retry(retry_policy);
            }

            let handle = service.send_funds(request).await?;
            println!("{}", serde_json::to_string_pretty(&handle)?);
        }
        Commands::Prices => {
            let rpc = BlockchainClient::new(config.blockchain)?;
            let gas_station = build_gas_station(&config.gas_station, &rpc);
            let prices = gas_station.get_gas_prices().await?;
            println!("{}", serde_json::to_string_pretty(&prices)?);
        }
        Commands::Status => {
            let funder = Wallet::from_env(config.blockchain.chain_id)?;
            let ceiling = SpendCeiling::from_ether(&config.funding.max_eth_to_send)?;
            let rpc = BlockchainClient::new(config.blockchain)?;

            let balance = match rpc.get_balance(funder.address()).await {
                Ok(wei) => Some(format_ether(wei)),
                Err(e) => {
                    tracing::warn!(error = %e, "Could not read funder balance");
                    None
                }
            };
            let chain_verified = match rpc.verify_chain_id().await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "Chain verification failed");
                    false
                }
            };
            let status = json!({
                "funder": funder.address().to_string(),
                "chain_id": rpc.config().chain_id,
                "chain_id_verified": chain_verified,
                "rpc_healthy": rpc.is_healthy().await,
                "balance_eth": balance,
                "spend_ceiling_eth": format_ether(ceiling.wei()),
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(())
}
