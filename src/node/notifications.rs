//! Notification source implementations over the node's RPC transports.
//!
//! Two profiles, mirroring how nodes are usually exposed:
//! - [`WsNotificationSource`] rides the node's pubsub `newHeads`
//!   subscription over WebSocket.
//! - [`PollingNotificationSource`] polls the chain head over plain HTTP for
//!   deployments without a WebSocket endpoint.
//!
//! Both emit block hashes and, for the transaction stream, the hashes of
//! the transactions confirmed in each new block.

use alloy::primitives::B256;
use alloy::providers::{Provider, ProviderBuilder, WsConnect};
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crate::events::source::{HashStream, NotificationSource, StreamError};

/// Push notifications over the node's WebSocket pubsub endpoint.
pub struct WsNotificationSource {
    provider: Arc<dyn Provider + Send + Sync>,
}

impl WsNotificationSource {
    /// Connect to the node's WebSocket endpoint.
    pub async fn connect(ws_url: &str) -> Result<Self, StreamError> {
        let provider = ProviderBuilder::new()
            .connect_ws(WsConnect::new(ws_url))
            .await?;
        tracing::info!(ws_url, "Connected to node WebSocket endpoint");
        Ok(Self {
            provider: Arc::new(provider),
        })
    }
}

#[async_trait]
impl NotificationSource for WsNotificationSource {
    async fn block_hashes(&self) -> Result<HashStream, StreamError> {
        let subscription = self.provider.subscribe_blocks().await?;
        Ok(subscription
            .into_stream()
            .map(|header| Ok(header.hash.to_string()))
            .boxed())
    }

    async fn transaction_hashes(&self) -> Result<HashStream, StreamError> {
        let subscription = self.provider.subscribe_blocks().await?;
        let provider = Arc::clone(&self.provider);
        Ok(subscription
            .into_stream()
            .then(move |header| {
                let provider = Arc::clone(&provider);
                async move { confirmed_transactions(provider, header.hash).await }
            })
            .flat_map(stream::iter)
            .boxed())
    }
}

async fn confirmed_transactions(
    provider: Arc<dyn Provider + Send + Sync>,
    block_hash: B256,
) -> Vec<Result<String, StreamError>> {
    match provider.get_block_by_hash(block_hash).await {
        Ok(Some(block)) => block
            .transactions
            .hashes()
            .map(|hash| Ok(hash.to_string()))
            .collect(),
        Ok(None) => Vec::new(),
        Err(error) => vec![Err(error.into())],
    }
}

/// Push notifications derived from polling the chain head over HTTP.
///
/// Starts at the head observed on the first poll, then emits hashes for
/// every later block in order. Poll failures surface as item-level stream
/// errors; polling continues on the next interval.
pub struct PollingNotificationSource {
    provider: Arc<dyn Provider + Send + Sync>,
    poll_interval: Duration,
}

impl PollingNotificationSource {
    /// Create a polling source over an existing provider.
    pub fn new(provider: Arc<dyn Provider + Send + Sync>, poll_interval: Duration) -> Self {
        Self {
            provider,
            poll_interval,
        }
    }

    fn poll_stream(&self, kind: PollKind) -> HashStream {
        let state = PollState {
            provider: Arc::clone(&self.provider),
            kind,
            interval: self.poll_interval,
            last_block: None,
            pending: VecDeque::new(),
        };
        stream::unfold(state, |mut state| async move {
            loop {
                if let Some(item) = state.pending.pop_front() {
                    return Some((item, state));
                }
                if let Err(error) = state.refill().await {
                    return Some((Err(error), state));
                }
            }
        })
        .boxed()
    }
}

#[async_trait]
impl NotificationSource for PollingNotificationSource {
    async fn block_hashes(&self) -> Result<HashStream, StreamError> {
        Ok(self.poll_stream(PollKind::Blocks))
    }

    async fn transaction_hashes(&self) -> Result<HashStream, StreamError> {
        Ok(self.poll_stream(PollKind::Transactions))
    }
}

#[derive(Clone, Copy)]
enum PollKind {
    Blocks,
    Transactions,
}

struct PollState {
    provider: Arc<dyn Provider + Send + Sync>,
    kind: PollKind,
    interval: Duration,
    last_block: Option<u64>,
    pending: VecDeque<Result<String, StreamError>>,
}

impl PollState {
    async fn refill(&mut self) -> Result<(), StreamError> {
        loop {
            if self.last_block.is_some() {
                tokio::time::sleep(self.interval).await;
            }

            let head = self.provider.get_block_number().await?;
            let Some(last) = self.last_block else {
                // First poll anchors at the current head; only later blocks notify.
                self.last_block = Some(head);
                continue;
            };
            if head <= last {
                continue;
            }

            for number in last + 1..=head {
                match self.provider.get_block_by_number(number.into()).await? {
                    Some(block) => match self.kind {
                        PollKind::Blocks => {
                            self.pending.push_back(Ok(block.header.hash.to_string()));
                        }
                        PollKind::Transactions => {
                            self.pending.extend(
                                block.transactions.hashes().map(|hash| Ok(hash.to_string())),
                            );
                        }
                    },
                    None => {
                        tracing::debug!(number, "Announced block not yet available over RPC");
                    }
                }
                self.last_block = Some(number);
            }

            if !self.pending.is_empty() {
                return Ok(());
            }
        }
    }
}
