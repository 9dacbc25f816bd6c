//! evm-cli
//!
//! # Architecture Overview
//!
//! ```text
//!   argv ──▶ clap (Cli) ──▶ config (TOML + flag overrides) ──▶ logging (stderr)
//!                                   │
//!                                   ▼
//!                     ┌──────────────────────────────┐
//!                     │           commands           │
//!                     └──────┬───────────────┬───────┘
//!                            │               │
//!              ┌─────────────▼───┐     ┌─────▼──────────────┐
//!              │    registry     │     │     blockchain     │
//!              │ keystore        │────▶│ client (alloy RPC) │────▶ node
//!              │ networks        │     │ transaction        │
//!              └───────┬─────────┘     └────────────────────┘
//!                      │
//!                      ▼
//!              storage (wallets.json, networks.json)
//! ```
//!
//! One command per process, run to completion on a current-thread runtime.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use evm_cli::commands::{self, CommandResult};
use evm_cli::config::{self, CliConfig};
use evm_cli::observability;

#[derive(Parser)]
#[command(name = "evm-cli", version)]
#[command(about = "Minimal client for Ethereum-compatible nodes", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, global = true, env = "EVM_CLI_CONFIG")]
    config: Option<PathBuf>,

    /// Keystore file (overrides the configuration).
    #[arg(long, global = true)]
    keystore: Option<PathBuf>,

    /// Network file (overrides the configuration).
    #[arg(long, global = true)]
    networks: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a wallet and store its private key
    GenerateWallet,
    /// List the addresses in the keystore
    #[command(visible_alias = "get-wallets-inmemory")]
    ListWallets,
    /// Register or replace the RPC endpoint for a network name
    #[command(visible_alias = "set-network-node")]
    SetNetwork { network: String, url: String },
    /// List registered networks
    ListNetworks,
    /// Print the latest block number
    #[command(visible_alias = "get-blocknumber")]
    BlockNumber { network: String },
    /// Sign and send a value transfer (amount in wei)
    CreateTransaction {
        network: String,
        from: String,
        to: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Print the balance of an address in ether
    GetBalance { network: String, address: String },
    /// Print the receipt of a mined transaction
    GetTransactionReceipt { network: String, tx_hash: String },
}

impl Cli {
    fn load_config(&self) -> Result<CliConfig, config::ConfigError> {
        let mut config = config::load_or_default(self.config.as_deref())?;
        if let Some(path) = &self.keystore {
            config.storage.keystore_path = path.clone();
        }
        if let Some(path) = &self.networks {
            config.storage.networks_path = path.clone();
        }
        config::validation::validate_config(&config).map_err(config::ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = observability::init_logging(&config.logging.filter) {
        eprintln!("Error: invalid log filter '{}': {}", config.logging.filter, e);
        return ExitCode::FAILURE;
    }

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &CliConfig) -> CommandResult<()> {
    let storage = &config.storage;
    let rpc = &config.rpc;

    match command {
        Commands::GenerateWallet => {
            let mut keystore = commands::open_keystore(storage)?;
            let wallet = commands::generate_wallet(&mut keystore)?;
            println!("Address: {}", wallet.address);
            println!("PrivateKey: {}", wallet.private_key_hex());
        }
        Commands::ListWallets => {
            let keystore = commands::open_keystore(storage)?;
            for address in commands::list_wallets(&keystore) {
                println!("{}", address);
            }
        }
        Commands::SetNetwork { network, url } => {
            let mut networks = commands::open_networks(storage)?;
            match commands::set_network(&mut networks, &network, &url)? {
                Some(previous) => println!("Network {} updated ({} -> {})", network, previous, url),
                None => println!("Network {} successfully added", network),
            }
        }
        Commands::ListNetworks => {
            let networks = commands::open_networks(storage)?;
            for (name, url) in commands::list_networks(&networks) {
                println!("{} = {}", name, url);
            }
        }
        Commands::BlockNumber { network } => {
            let networks = commands::open_networks(storage)?;
            let height = commands::block_number(&networks, rpc, &network).await?;
            println!("{}", height);
        }
        Commands::CreateTransaction {
            network,
            from,
            to,
            amount,
        } => {
            let networks = commands::open_networks(storage)?;
            let keystore = commands::open_keystore(storage)?;
            let tx_hash = commands::create_transaction(
                &networks, &keystore, rpc, &network, &from, &to, &amount,
            )
            .await?;
            println!("{}", tx_hash);
        }
        Commands::GetBalance { network, address } => {
            let networks = commands::open_networks(storage)?;
            let balance = commands::get_balance(&networks, rpc, &network, &address).await?;
            println!("{}", balance);
        }
        Commands::GetTransactionReceipt { network, tx_hash } => {
            let networks = commands::open_networks(storage)?;
            let receipt = commands::transaction_receipt(&networks, rpc, &network, &tx_hash).await?;
            println!("{}", receipt);
        }
    }

    Ok(())
}
