//! One handler per CLI subcommand.

use alloy::primitives::{Address, TxHash};

use crate::blockchain::transaction::{build_and_send, parse_amount};
use crate::blockchain::types::{format_balance, parse_address, parse_tx_hash, ReceiptSummary};
use crate::blockchain::{ChainApi, ChainClient, TransferError};
use crate::commands::{CommandError, CommandResult};
use crate::config::RpcConfig;
use crate::registry::{Keystore, NetworkRegistry, WalletEntry};

/// Resolve `network` and open a verified connection to it.
pub async fn connect(
    networks: &NetworkRegistry,
    rpc: &RpcConfig,
    network: &str,
) -> CommandResult<ChainClient> {
    let endpoint = networks
        .resolve(network)
        .ok_or_else(|| CommandError::UnknownNetwork(network.to_string()))?;
    Ok(ChainClient::connect(endpoint, rpc.timeout()).await?)
}

/// Generate a wallet and persist the keystore.
pub fn generate_wallet(keystore: &mut Keystore) -> CommandResult<WalletEntry> {
    let entry = keystore.generate();
    keystore.save()?;
    Ok(entry)
}

/// Addresses held by the keystore.
pub fn list_wallets(keystore: &Keystore) -> Vec<Address> {
    keystore.list()
}

/// Register or replace a network endpoint and persist the registry.
///
/// Returns the endpoint that was replaced, if any.
pub fn set_network(
    networks: &mut NetworkRegistry,
    name: &str,
    endpoint_url: &str,
) -> CommandResult<Option<String>> {
    let previous = networks.set(name, endpoint_url);
    networks.save()?;
    tracing::info!(
        network = name,
        endpoint = endpoint_url,
        replaced = previous.is_some(),
        "Network set"
    );
    Ok(previous)
}

/// Registered `(name, endpoint)` pairs.
pub fn list_networks(networks: &NetworkRegistry) -> Vec<(String, String)> {
    networks
        .list()
        .map(|(name, url)| (name.to_string(), url.to_string()))
        .collect()
}

/// Latest block height on `network`.
pub async fn block_number(
    networks: &NetworkRegistry,
    rpc: &RpcConfig,
    network: &str,
) -> CommandResult<u64> {
    let client = connect(networks, rpc, network).await?;
    Ok(client.block_number().await?)
}

/// Balance of `address` on `network`, as a decimal ether string.
pub async fn get_balance(
    networks: &NetworkRegistry,
    rpc: &RpcConfig,
    network: &str,
    address: &str,
) -> CommandResult<String> {
    let address = parse_address(address)?;
    let client = connect(networks, rpc, network).await?;
    let wei = client.balance(address).await?;
    Ok(format_balance(wei))
}

/// Receipt for `tx_hash` on `network`.
///
/// A malformed hash fails before connecting; an unknown or unmined
/// transaction is [`BlockchainError::ReceiptNotFound`](crate::blockchain::BlockchainError).
pub async fn transaction_receipt(
    networks: &NetworkRegistry,
    rpc: &RpcConfig,
    network: &str,
    tx_hash: &str,
) -> CommandResult<ReceiptSummary> {
    let tx_hash = parse_tx_hash(tx_hash)?;
    let client = connect(networks, rpc, network).await?;
    let receipt = client.transaction_receipt(tx_hash).await?;
    Ok(ReceiptSummary::from(&receipt))
}

/// Send `amount` wei from a keystore wallet to `to`.
pub async fn create_transaction(
    networks: &NetworkRegistry,
    keystore: &Keystore,
    rpc: &RpcConfig,
    network: &str,
    from: &str,
    to: &str,
    amount: &str,
) -> CommandResult<TxHash> {
    let amount = parse_amount(amount)?;
    let from = parse_address(from)?;
    let signer = keystore
        .signer(&from)
        .ok_or(CommandError::UnknownWallet(from))?;

    build_and_send(networks, rpc.timeout(), network, signer, to, amount)
        .await
        .map_err(|e| match e {
            TransferError::UnknownNetwork(name) => CommandError::UnknownNetwork(name),
            other => CommandError::Transfer(other),
        })
}
