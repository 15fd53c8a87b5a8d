// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use crate::domain::transaction::{SignedTransaction, TransactionReceipt};
use crate::network::gas::GasFees;
use crate::network::provider::{ConnectionFactory, HttpProvider};
use alloy::primitives::{Address, B256, Bytes, TxKind, U256};
use alloy::providers::Provider;
use alloy::rpc::types::eth::{TransactionInput, TransactionRequest};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

/// How long to wait for a submitted transaction and how often to ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl ReceiptPolicy {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval: poll_interval.max(Duration::from_millis(1)),
        }
    }
}

/// The only component that talks to the node. Everything above it (guard,
/// builders, engine) is generic over this trait.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Fee pair attached to every transaction; fixed for the run.
    fn suggest_fee(&self) -> GasFees;

    /// Account transaction count as reported by the node.
    async fn current_nonce(&self, address: Address) -> Result<u64, AppError>;

    async fn native_balance(&self, address: Address) -> Result<U256, AppError>;

    /// Read-only `eth_call` against the latest block.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, AppError>;

    /// Broadcast signed bytes. A synchronous node rejection is a `Submission` error.
    async fn submit(&self, tx: &SignedTransaction) -> Result<B256, AppError>;

    /// Single receipt lookup; `None` while the transaction is unmined.
    async fn get_receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>, AppError>;

    /// Poll until `hash` is mined. Each lookup is bounded by what is left of
    /// the window, so a stalled node still ends in `ConfirmationTimeout`.
    /// Lookup errors inside the window are logged and polling continues.
    async fn await_receipt(
        &self,
        hash: B256,
        policy: ReceiptPolicy,
    ) -> Result<TransactionReceipt, AppError> {
        let deadline = Instant::now() + policy.timeout;
        let timed_out = || AppError::ConfirmationTimeout {
            hash,
            waited_secs: policy.timeout.as_secs(),
        };
        loop {
            let lookup = tokio::time::timeout_at(deadline, self.get_receipt(hash))
                .await
                .map_err(|_| timed_out())?;
            match lookup {
                Ok(Some(receipt)) => {
                    if !receipt.success {
                        return Err(AppError::TransactionReverted {
                            hash,
                            block: receipt.block_number,
                        });
                    }
                    return Ok(receipt);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        target: "rpc",
                        error = %e,
                        hash = %format!("{:#x}", hash),
                        "Receipt lookup error; polling again"
                    );
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(timed_out());
            }
            tokio::time::sleep_until((now + policy.poll_interval).min(deadline)).await;
        }
    }
}

/// JSON-RPC backed client over a single HTTP endpoint.
#[derive(Clone)]
pub struct RpcChainClient {
    provider: HttpProvider,
    fees: GasFees,
}

impl RpcChainClient {
    pub fn new(provider: HttpProvider, fees: GasFees) -> Self {
        Self { provider, fees }
    }

    /// Connect, verify reachability and refuse a node serving another chain.
    pub async fn connect(
        rpc_url: &str,
        expected_chain_id: u64,
        fees: GasFees,
    ) -> Result<Self, AppError> {
        let (provider, chain_id) = ConnectionFactory::connect_checked(rpc_url).await?;
        if chain_id != expected_chain_id {
            return Err(AppError::Config(format!(
                "RPC {rpc_url} serves chain {chain_id}, expected {expected_chain_id}"
            )));
        }
        tracing::info!(target: "rpc", rpc = %rpc_url, chain_id, "Connected to node");
        Ok(Self::new(provider, fees))
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    fn suggest_fee(&self) -> GasFees {
        self.fees
    }

    async fn current_nonce(&self, address: Address) -> Result<u64, AppError> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(|e| AppError::Connection(format!("Failed to fetch nonce: {}", e)))
    }

    async fn native_balance(&self, address: Address) -> Result<U256, AppError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| AppError::Connection(format!("Failed to fetch balance: {}", e)))
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, AppError> {
        let request = TransactionRequest {
            to: Some(TxKind::Call(to)),
            input: TransactionInput::new(data),
            ..Default::default()
        };
        self.provider
            .call(request)
            .await
            .map_err(|e| AppError::Connection(format!("eth_call to {to:#x} failed: {e}")))
    }

    async fn submit(&self, tx: &SignedTransaction) -> Result<B256, AppError> {
        let pending = self
            .provider
            .send_raw_transaction(tx.raw.as_ref())
            .await
            .map_err(|e| AppError::Submission(format!("nonce {}: {}", tx.nonce, e)))?;
        Ok(*pending.tx_hash())
    }

    async fn get_receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>, AppError> {
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| AppError::Connection(format!("Receipt lookup failed: {}", e)))?;

        // A receipt without a block number belongs to a pending block.
        Ok(receipt.and_then(|rcpt| {
            rcpt.block_number.map(|block_number| TransactionReceipt {
                transaction_hash: rcpt.transaction_hash,
                block_number,
                success: rcpt.status(),
            })
        }))
    }
}
