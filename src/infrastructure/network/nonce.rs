// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::error::AppError;
use crate::network::client::ChainClient;
use alloy::primitives::Address;

/// Process-local "next nonce" for the run's account.
///
/// Seeded from the node once at startup and never re-read: the run assumes
/// exclusive control of the account, and re-reading while a receipt is still
/// outstanding could hand out a nonce twice.
#[derive(Debug, Clone)]
pub struct NonceCounter {
    start: u64,
    next: u64,
}

impl NonceCounter {
    pub async fn initialize<C>(client: &C, address: Address) -> Result<Self, AppError>
    where
        C: ChainClient + ?Sized,
    {
        let on_chain_nonce = client.current_nonce(address).await?;
        tracing::info!(
            target: "nonce",
            address = %format!("{:#x}", address),
            nonce = on_chain_nonce,
            "Starting nonce loaded"
        );
        Ok(Self::starting_at(on_chain_nonce))
    }

    pub fn starting_at(nonce: u64) -> Self {
        Self {
            start: nonce,
            next: nonce,
        }
    }

    /// Nonce the next transaction will carry.
    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    /// Mark the current nonce as used on-chain; returns the consumed value.
    pub fn advance(&mut self) -> u64 {
        let used = self.next;
        self.next = self.next.saturating_add(1);
        tracing::debug!(target: "nonce", used, next = self.next, "Nonce advanced");
        used
    }

    /// Transactions confirmed since the counter was seeded.
    pub fn consumed(&self) -> u64 {
        self.next - self.start
    }
}
