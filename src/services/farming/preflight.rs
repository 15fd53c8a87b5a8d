// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::common::constants::NATIVE_DECIMALS;
use crate::common::error::AppError;
use crate::data::abi::ERC20;
use crate::domain::token::Token;
use crate::network::client::ChainClient;
use crate::services::farming::engine::RunParameters;
use alloy::primitives::utils::format_units;
use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSnapshot {
    /// `None` when the node could not report it.
    pub native: Option<U256>,
    /// Balances that were read; tokens whose read failed are absent.
    pub tokens: Vec<(Token, U256)>,
    /// Native needed for the transfer phase alone, excluding gas.
    pub transfer_budget: U256,
}

impl BalanceSnapshot {
    /// An unknown native balance is not reported as short.
    pub fn covers_transfers(&self) -> bool {
        self.native.is_none_or(|native| native >= self.transfer_budget)
    }
}

pub async fn token_balance<C>(client: &C, token: Token, owner: Address) -> Result<U256, AppError>
where
    C: ChainClient + ?Sized,
{
    if token.is_native() {
        return client.native_balance(owner).await;
    }
    let calldata = ERC20::balanceOfCall { owner }.abi_encode();
    let raw = client.call(token.address(), calldata.into()).await?;
    ERC20::balanceOfCall::abi_decode_returns(&raw)
        .map_err(|e| AppError::Connection(format!("Undecodable balance from {token}: {e}")))
}

/// Startup balance report over the run's own token set. Informational only:
/// failed reads and low balances are logged and the run proceeds.
pub async fn preflight<C>(client: &C, owner: Address, params: &RunParameters) -> BalanceSnapshot
where
    C: ChainClient + ?Sized,
{
    let native = match client.native_balance(owner).await {
        Ok(native) => {
            tracing::info!(
                target: "engine",
                address = %format!("{:#x}", owner),
                native = %format_balance(native, NATIVE_DECIMALS),
                "Native balance"
            );
            Some(native)
        }
        Err(e) => {
            tracing::warn!(target: "engine", error = %e, "Native balance unavailable");
            None
        }
    };

    let mut tokens = Vec::new();
    for &token in params.tokens.iter().filter(|t| !t.is_native()) {
        match token_balance(client, token, owner).await {
            Ok(balance) => {
                tracing::info!(
                    target: "engine",
                    token = %token,
                    balance = %format_balance(balance, token.decimals()),
                    "Token balance"
                );
                tokens.push((token, balance));
            }
            Err(e) => {
                tracing::warn!(target: "engine", token = %token, error = %e, "Token balance unavailable");
            }
        }
    }

    let transfer_budget = match params.native_amount.to_base_units(NATIVE_DECIMALS) {
        Ok(per_transfer) => per_transfer.saturating_mul(U256::from(params.transfer_count)),
        Err(e) => {
            tracing::warn!(target: "engine", error = %e, "Transfer amount not representable");
            U256::ZERO
        }
    };
    let snapshot = BalanceSnapshot {
        native,
        tokens,
        transfer_budget,
    };

    if let Some(native) = native
        && !snapshot.covers_transfers()
    {
        tracing::warn!(
            target: "engine",
            native = %format_balance(native, NATIVE_DECIMALS),
            needed = %format_balance(transfer_budget, NATIVE_DECIMALS),
            "Native balance does not cover the configured transfers"
        );
    }
    snapshot
}

fn format_balance(amount: U256, decimals: u8) -> String {
    format_units(amount, decimals).unwrap_or_else(|_| amount.to_string())
}
