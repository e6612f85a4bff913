//! Ethereum node client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the node's JSON-RPC endpoint
//! - Query chain state (accounts, balances, transaction counts)
//! - Submit fire-and-forget fund transfers from unlocked accounts
//! - Wrap transport failures into the single domain error kind

use alloy::network::TransactionBuilder;
use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::schema::{NodeConfig, TransferConfig};
use crate::node::error::{NodeError, NodeResult};

/// Client wrapper around the node's JSON-RPC provider.
#[derive(Clone)]
pub struct NodeClient {
    provider: Arc<dyn Provider + Send + Sync>,
    rpc_url: String,
    timeout_duration: Duration,
    gas_price_wei: u128,
    gas_limit: u64,
}

impl NodeClient {
    /// Create a new node client.
    ///
    /// Probes the node's chain id once; an unreachable node is logged but
    /// does not fail construction, so the gateway can start before the node.
    pub async fn new(node: &NodeConfig, transfer: &TransferConfig) -> NodeResult<Self> {
        let url: url::Url = node.rpc_url.parse().map_err(|error| {
            NodeError::with_source(format!("Invalid RPC URL '{}'", node.rpc_url), error)
        })?;

        let client = Self {
            provider: Arc::new(ProviderBuilder::new().connect_http(url))
                as Arc<dyn Provider + Send + Sync>,
            rpc_url: node.rpc_url.clone(),
            timeout_duration: Duration::from_secs(node.rpc_timeout_secs),
            gas_price_wei: transfer.gas_price_wei,
            gas_limit: transfer.gas_limit,
        };

        match client.chain_id().await {
            Ok(chain_id) => {
                tracing::info!(rpc_url = %client.rpc_url, chain_id, "Node client initialized");
            }
            Err(error) => {
                tracing::warn!(
                    rpc_url = %client.rpc_url,
                    error = %error,
                    "Node client initialized but the node is unreachable"
                );
            }
        }

        Ok(client)
    }

    /// Get the chain id reported by the node.
    pub async fn chain_id(&self) -> NodeResult<u64> {
        let fut = self.provider.get_chain_id();
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(chain_id)) => Ok(chain_id),
            Ok(Err(error)) => Err(NodeError::with_source(
                "Could not get the chain id from the node",
                error,
            )),
            Err(_) => Err(self.timed_out("Could not get the chain id from the node")),
        }
    }

    /// Get the latest block number.
    pub async fn block_number(&self) -> NodeResult<u64> {
        let fut = self.provider.get_block_number();
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(number)) => Ok(number),
            Ok(Err(error)) => Err(NodeError::with_source(
                "Could not get the latest block number",
                error,
            )),
            Err(_) => Err(self.timed_out("Could not get the latest block number")),
        }
    }

    /// Number of transactions sent from the given account, at the latest block.
    pub async fn transaction_count(&self, account_address: &str) -> NodeResult<u64> {
        let address = parse_account(account_address)?;
        let fut = self.provider.get_transaction_count(address);
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(count)) => Ok(count),
            Ok(Err(error)) => Err(NodeError::with_source(
                format!("Could not get transaction count for address {account_address}"),
                error,
            )),
            Err(_) => Err(self.timed_out(format!(
                "Could not get transaction count for address {account_address}"
            ))),
        }
    }

    /// Balance of the given account, converted from wei to an ether decimal.
    pub async fn balance(&self, account_address: &str) -> NodeResult<String> {
        let address = parse_account(account_address)?;
        let fut = self.provider.get_balance(address);
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(wei)) => Ok(format_ether(wei)),
            Ok(Err(error)) => Err(NodeError::with_source(
                format!("Could not get the balance of account {account_address}"),
                error,
            )),
            Err(_) => Err(self.timed_out(format!(
                "Could not get the balance of account {account_address}"
            ))),
        }
    }

    /// Accounts owned (unlocked) by the node.
    pub async fn accounts(&self) -> NodeResult<Vec<String>> {
        let fut = self.provider.get_accounts();
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(accounts)) => Ok(accounts
                .into_iter()
                .map(|address| address.to_string())
                .collect()),
            Ok(Err(error)) => Err(NodeError::with_source(
                "Could not get accounts information",
                error,
            )),
            Err(_) => Err(self.timed_out("Could not get accounts information")),
        }
    }

    /// Send ether from an unlocked account to another account.
    ///
    /// Fire-and-forget: arguments are validated synchronously, then the
    /// transaction is submitted from a spawned task. A failed send surfaces
    /// only through an error log, never to the caller.
    pub fn transfer_fund(
        &self,
        sender_address: &str,
        recipient_address: &str,
        amount_in_ether: &str,
    ) -> NodeResult<()> {
        let sender = parse_account(sender_address)?;
        let recipient = parse_account(recipient_address)?;
        let amount_wei = parse_amount(amount_in_ether)?;

        let transaction = TransactionRequest::default()
            .with_from(sender)
            .with_to(recipient)
            .with_value(amount_wei)
            .with_gas_price(self.gas_price_wei)
            .with_gas_limit(self.gas_limit);

        let provider = Arc::clone(&self.provider);
        let timeout_duration = self.timeout_duration;
        tokio::spawn(async move {
            match timeout(timeout_duration, provider.send_transaction(transaction)).await {
                Ok(Ok(pending)) => {
                    tracing::info!(
                        transaction_hash = %pending.tx_hash(),
                        from = %sender,
                        to = %recipient,
                        "Fund transfer submitted"
                    );
                }
                Ok(Err(error)) => {
                    tracing::error!(
                        error = %error,
                        "Could not complete Ether transfer to the blockchain"
                    );
                }
                Err(_) => {
                    tracing::error!(
                        "Could not complete Ether transfer to the blockchain: request timed out"
                    );
                }
            }
        });

        Ok(())
    }

    /// Shared handle to the underlying provider.
    pub fn provider(&self) -> Arc<dyn Provider + Send + Sync> {
        Arc::clone(&self.provider)
    }

    fn timed_out(&self, message: impl Into<String>) -> NodeError {
        NodeError::new(format!(
            "{}: timed out after {} seconds",
            message.into(),
            self.timeout_duration.as_secs()
        ))
    }
}

impl std::fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient")
            .field("rpc_url", &self.rpc_url)
            .field("timeout", &self.timeout_duration)
            .field("gas_price_wei", &self.gas_price_wei)
            .field("gas_limit", &self.gas_limit)
            .finish()
    }
}

fn parse_account(account_address: &str) -> NodeResult<Address> {
    if account_address.trim().is_empty() {
        return Err(NodeError::new("Account address must not be empty"));
    }
    account_address.parse().map_err(|error| {
        NodeError::with_source(format!("Invalid account address '{account_address}'"), error)
    })
}

fn parse_amount(amount_in_ether: &str) -> NodeResult<U256> {
    if amount_in_ether.trim().starts_with('-') {
        return Err(NodeError::new("Transfer amount must be positive"));
    }
    let amount_wei = parse_ether(amount_in_ether.trim()).map_err(|error| {
        NodeError::with_source(
            format!("Invalid transfer amount '{amount_in_ether}'"),
            error,
        )
    })?;
    if amount_wei.is_zero() {
        return Err(NodeError::new("Transfer amount must be positive"));
    }
    Ok(amount_wei)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{NodeConfig, TransferConfig};
    use std::error::Error;

    fn unreachable_client() -> NodeConfig {
        NodeConfig {
            // Nothing listens on the discard port; connections fail fast.
            rpc_url: "http://127.0.0.1:9".to_string(),
            ws_url: None,
            rpc_timeout_secs: 2,
            poll_interval_ms: 100,
        }
    }

    #[tokio::test]
    async fn creation_succeeds_with_unreachable_node() {
        let client = NodeClient::new(&unreachable_client(), &TransferConfig::default()).await;
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn invalid_rpc_url_is_rejected() {
        let mut config = unreachable_client();
        config.rpc_url = "not a url".to_string();

        let result = NodeClient::new(&config, &TransferConfig::default()).await;

        assert!(result.unwrap_err().to_string().contains("Invalid RPC URL"));
    }

    #[tokio::test]
    async fn balance_failure_names_the_account_and_keeps_the_cause() {
        let client = NodeClient::new(&unreachable_client(), &TransferConfig::default())
            .await
            .unwrap();
        let account = "0x5dd4232f1af576f239d69f77f61dc08d9fda4ca2";

        let error = client.balance(account).await.unwrap_err();

        assert!(error.to_string().contains(account));
        assert!(error.source().is_some());
    }

    #[tokio::test]
    async fn transaction_count_failure_names_the_account() {
        let client = NodeClient::new(&unreachable_client(), &TransferConfig::default())
            .await
            .unwrap();
        let account = "0x5dd4232f1af576f239d69f77f61dc08d9fda4ca2";

        let error = client.transaction_count(account).await.unwrap_err();

        assert!(error.to_string().contains(account));
    }

    #[tokio::test]
    async fn empty_account_address_is_rejected() {
        let client = NodeClient::new(&unreachable_client(), &TransferConfig::default())
            .await
            .unwrap();

        let error = client.balance("").await.unwrap_err();

        assert!(error.to_string().contains("must not be empty"));
    }

    #[tokio::test]
    async fn malformed_account_address_is_rejected() {
        let client = NodeClient::new(&unreachable_client(), &TransferConfig::default())
            .await
            .unwrap();

        let error = client.transaction_count("0xnothex").await.unwrap_err();

        assert!(error.to_string().contains("Invalid account address"));
    }

    #[tokio::test]
    async fn transfer_returns_before_the_send_resolves() {
        let client = NodeClient::new(&unreachable_client(), &TransferConfig::default())
            .await
            .unwrap();

        // The node is unreachable, yet the call itself succeeds immediately.
        let result = client.transfer_fund(
            "0x5dd4232f1af576f239d69f77f61dc08d9fda4ca2",
            "0xeff48dbf9b40dd5ba47ff52841d359fc1e749491",
            "1",
        );

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn transfer_rejects_non_positive_amounts() {
        let client = NodeClient::new(&unreachable_client(), &TransferConfig::default())
            .await
            .unwrap();

        for amount in ["0", "-1"] {
            let error = client
                .transfer_fund(
                    "0x5dd4232f1af576f239d69f77f61dc08d9fda4ca2",
                    "0xeff48dbf9b40dd5ba47ff52841d359fc1e749491",
                    amount,
                )
                .unwrap_err();
            assert!(error.to_string().contains("must be positive"));
        }
    }

    #[test]
    fn parse_amount_converts_ether_to_wei() {
        let wei = parse_amount("1").unwrap();
        assert_eq!(wei, U256::from(1_000_000_000_000_000_000u128));
    }
}
