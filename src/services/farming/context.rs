// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use crate::domain::token::Token;
use crate::domain::transaction::{TransactionReceipt, UnsignedTransaction};
use crate::network::client::{ChainClient, ReceiptPolicy};
use crate::network::nonce::NonceCounter;
use crate::services::farming::signer::TxSigner;
use alloy::primitives::{Address, B256};
use std::fmt;

/// What a submitted transaction was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Approval(Token),
    Transfer,
    Swap,
    AddLiquidity,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Approval(token) => write!(f, "approve {token}"),
            ActionKind::Transfer => f.write_str("transfer"),
            ActionKind::Swap => f.write_str("swap"),
            ActionKind::AddLiquidity => f.write_str("add-liquidity"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmedTx {
    pub kind: ActionKind,
    pub nonce: u64,
    pub hash: B256,
    pub block_number: u64,
}

/// Per-run state owned by the engine: account, signer, chain id, receipt
/// policy and the nonce counter. Only `execute` moves the counter.
#[derive(Debug)]
pub struct RunContext {
    signer: TxSigner,
    chain_id: u64,
    receipt_policy: ReceiptPolicy,
    nonce: NonceCounter,
    confirmed: Vec<ConfirmedTx>,
}

impl RunContext {
    pub fn new(
        signer: TxSigner,
        chain_id: u64,
        receipt_policy: ReceiptPolicy,
        nonce: NonceCounter,
    ) -> Self {
        Self {
            signer,
            chain_id,
            receipt_policy,
            nonce,
            confirmed: Vec::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn next_nonce(&self) -> u64 {
        self.nonce.peek()
    }

    pub fn nonce_counter(&self) -> &NonceCounter {
        &self.nonce
    }

    pub fn confirmed(&self) -> &[ConfirmedTx] {
        &self.confirmed
    }

    /// Fill nonce, fees and chain id; sign, submit and block until mined.
    /// The counter advances only once the receipt reports success.
    pub async fn execute<C>(
        &mut self,
        client: &C,
        mut request: UnsignedTransaction,
        kind: ActionKind,
    ) -> Result<TransactionReceipt, AppError>
    where
        C: ChainClient + ?Sized,
    {
        let nonce = self.nonce.peek();
        match request.nonce {
            Some(preset) if preset != nonce => {
                return Err(AppError::InvalidTransaction(format!(
                    "{kind} carries nonce {preset}, run is at {nonce}"
                )));
            }
            _ => request.nonce = Some(nonce),
        }
        let fees = client.suggest_fee();
        request.max_fee_per_gas.get_or_insert(fees.max_fee_per_gas);
        request
            .max_priority_fee_per_gas
            .get_or_insert(fees.max_priority_fee_per_gas);
        request.chain_id.get_or_insert(self.chain_id);

        let signed = self.signer.sign(&request)?;
        let hash = client.submit(&signed).await?;
        if hash != signed.hash {
            tracing::warn!(
                target: "engine",
                local = %format!("{:#x}", signed.hash),
                node = %format!("{:#x}", hash),
                "Node reported a different tx hash"
            );
        }
        tracing::info!(
            target: "engine",
            action = %kind,
            nonce,
            hash = %format!("{:#x}", hash),
            "Transaction submitted"
        );

        let receipt = client.await_receipt(hash, self.receipt_policy).await?;
        self.nonce.advance();
        self.confirmed.push(ConfirmedTx {
            kind,
            nonce,
            hash,
            block_number: receipt.block_number,
        });
        tracing::info!(
            target: "engine",
            action = %kind,
            block = receipt.block_number,
            "Mined in block {}",
            receipt.block_number
        );
        Ok(receipt)
    }
}
